use thiserror::Error;

/// Errors from [`crate::heap::BlockHeap::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("heap region of {len} bytes cannot hold a single block header")]
    RegionTooSmall { len: usize },
    #[error("heap region of {len} bytes exceeds the 32-bit offset space")]
    RegionTooLarge { len: usize },
}

/// Errors from [`crate::exerciser::Exerciser::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExerciseError {
    #[error("allocation size bound must be non-zero")]
    ZeroBound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not an unsigned 32-bit integer")]
    InvalidNumber { key: &'static str, value: String },
}
