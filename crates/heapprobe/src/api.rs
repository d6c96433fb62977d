//! C entry points for a host driver.

use crate::allocator::SystemAllocator;
use crate::exerciser::Exerciser;
use crate::heap_base::heap_base;
use crate::init::{self, STATE_READY};
use crate::rng::Lcg;
use crate::term::nth_term;
use core::ffi::{c_int, c_uint, c_ulong, c_void};

/// Negative `n` takes the same fallback as `n < 3`. The result is truncated
/// to the native `unsigned long`, which is the same as wrapping at that width.
#[no_mangle]
pub extern "C" fn fibonacci(n: c_int) -> c_ulong {
    nth_term(u32::try_from(n).unwrap_or(0)) as c_ulong
}

/// Run `n` random malloc/free operations with sizes in `1..=max` against the
/// environment's allocator. The generator continues where the previous call
/// left off. Blocks still live at the end stay allocated; `max == 0` does
/// nothing.
#[no_mangle]
pub extern "C" fn malloc_test(n: c_uint, max: c_uint) {
    init::ensure_initialized();
    if init::state() != STATE_READY {
        return;
    }

    let mut rng = Lcg::new(init::seed());
    if let Ok(mut exerciser) = Exerciser::new(SystemAllocator, &mut rng, n, max) {
        exerciser.run();
    }
    init::store_seed(rng.seed());
}

#[no_mangle]
pub extern "C" fn get_heap_base() -> *mut c_void {
    heap_base().cast()
}
