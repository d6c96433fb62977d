//! Sequence terms and a deterministic allocator exerciser for hosts that
//! expose a single linear memory region.
//!
//! The Rust API lives in [`term`], [`exerciser`] and [`heap`]; [`api`]
//! exports the same functionality under C names for a host driver.

#[cfg(not(target_arch = "wasm32"))]
extern crate libc;

pub mod allocator;
pub mod api;
pub mod config;
pub mod error;
pub mod exerciser;
pub mod heap;
pub mod heap_base;
pub mod init;
pub mod rng;
pub mod term;

pub use allocator::{RawAllocator, SystemAllocator};
pub use error::{ConfigError, ExerciseError, HeapError};
pub use exerciser::{exercise, Exerciser, LiveSet, Op, Summary};
pub use heap::BlockHeap;
pub use rng::Lcg;
pub use term::nth_term;
