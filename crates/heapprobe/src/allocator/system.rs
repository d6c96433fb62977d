//! The environment's own `malloc`/`free`.
//!
//! On hosted targets these resolve through libc. On `wasm32` they are
//! imported from the host's `env` module, which is where the driver installs
//! its allocator over linear memory.

use super::RawAllocator;
use core::ffi::c_void;
use core::ptr::NonNull;

#[cfg(not(target_arch = "wasm32"))]
mod sys {
    pub use libc::{free, malloc};
}

#[cfg(target_arch = "wasm32")]
mod sys {
    use core::ffi::c_void;

    extern "C" {
        pub fn malloc(size: usize) -> *mut c_void;
        pub fn free(ptr: *mut c_void);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl RawAllocator for SystemAllocator {
    type Handle = NonNull<u8>;

    #[inline]
    fn allocate(&mut self, size: usize) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { sys::malloc(size) } as *mut u8)
    }

    #[inline]
    unsafe fn release(&mut self, handle: NonNull<u8>) {
        sys::free(handle.as_ptr() as *mut c_void);
    }
}
