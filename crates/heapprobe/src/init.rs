//! One-time setup for the C entry points.
//!
//! Config is read on first use and cached; the process-wide generator seed
//! lives here so consecutive `malloc_test` calls continue one sequence.

use crate::config::Config;
use crate::rng::DEFAULT_SEED;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use tracing::debug;

const UNINIT: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;
const DISABLED: u8 = 3;

pub static INIT_STATE: AtomicU8 = AtomicU8::new(UNINIT);

static SEED: AtomicU32 = AtomicU32::new(DEFAULT_SEED);

pub fn init() {
    match INIT_STATE.compare_exchange(UNINIT, INITIALIZING, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {}
        Err(INITIALIZING) => {
            while INIT_STATE.load(Ordering::Acquire) == INITIALIZING {
                core::hint::spin_loop();
            }
            return;
        }
        Err(_) => return,
    }

    let config = Config::from_env();
    debug!(?config, "heapprobe init");
    SEED.store(config.seed, Ordering::Relaxed);

    if config.disabled {
        INIT_STATE.store(DISABLED, Ordering::Release);
        return;
    }
    INIT_STATE.store(READY, Ordering::Release);
}

#[inline]
pub fn ensure_initialized() {
    if state() == UNINIT {
        init();
    }
}

#[inline(always)]
pub fn state() -> u8 {
    INIT_STATE.load(Ordering::Acquire)
}

/// Current state of the process-wide generator.
pub fn seed() -> u32 {
    SEED.load(Ordering::Relaxed)
}

pub fn store_seed(seed: u32) {
    SEED.store(seed, Ordering::Relaxed);
}

pub const STATE_READY: u8 = READY;
pub const STATE_DISABLED: u8 = DISABLED;
