pub mod system;

pub use system::SystemAllocator;

/// An allocate/release capability driven by the exerciser.
///
/// `allocate` returns `None` when the allocator is exhausted; callers treat
/// that as a soft failure. Handles must be distinct from every other handle
/// that is still live.
pub trait RawAllocator {
    type Handle: Copy + Eq + core::fmt::Debug;

    fn allocate(&mut self, size: usize) -> Option<Self::Handle>;

    /// Return `handle` to the allocator.
    ///
    /// # Safety
    /// `handle` must have come from `allocate` on this allocator and must not
    /// have been released since.
    unsafe fn release(&mut self, handle: Self::Handle);
}

impl<A: RawAllocator + ?Sized> RawAllocator for &mut A {
    type Handle = A::Handle;

    #[inline]
    fn allocate(&mut self, size: usize) -> Option<Self::Handle> {
        (**self).allocate(size)
    }

    #[inline]
    unsafe fn release(&mut self, handle: Self::Handle) {
        (**self).release(handle)
    }
}
