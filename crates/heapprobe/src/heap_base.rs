//! Start of the memory available to the environment's allocator.

#[cfg(target_arch = "wasm32")]
extern "C" {
    /// Placed by the linker right after the module's static data and stack.
    static __heap_base: u8;
}

/// Address of the first byte of unmanaged memory.
#[cfg(target_arch = "wasm32")]
#[inline]
pub fn heap_base() -> *mut u8 {
    unsafe { core::ptr::addr_of!(__heap_base) as *mut u8 }
}

/// Size of the static region standing in for free linear memory on hosted
/// targets (two 64 KiB pages).
#[cfg(not(target_arch = "wasm32"))]
pub const HOST_HEAP_SIZE: usize = 2 * 65536;

#[cfg(not(target_arch = "wasm32"))]
static mut HOST_HEAP: [u8; HOST_HEAP_SIZE] = [0u8; HOST_HEAP_SIZE];

/// Address of the first byte of unmanaged memory.
#[cfg(not(target_arch = "wasm32"))]
#[inline]
pub fn heap_base() -> *mut u8 {
    unsafe { core::ptr::addr_of_mut!(HOST_HEAP).cast::<u8>() }
}

/// The host stand-in region as a slice, for running a
/// [`BlockHeap`](crate::heap::BlockHeap) over it.
///
/// # Safety
/// No other reference to the region may be live while the returned slice
/// is in use, and nothing else may be writing through [`heap_base`].
#[cfg(not(target_arch = "wasm32"))]
pub unsafe fn host_heap() -> &'static mut [u8] {
    core::slice::from_raw_parts_mut(heap_base(), HOST_HEAP_SIZE)
}
