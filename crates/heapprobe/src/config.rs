use crate::error::ConfigError;
use crate::rng::DEFAULT_SEED;
use tracing::warn;

/// Initial seed of the process-wide generator behind `malloc_test`.
pub const SEED_VAR: &str = "HEAPPROBE_SEED";
/// When set (to anything), `malloc_test` does nothing.
pub const DISABLE_VAR: &str = "HEAPPROBE_DISABLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub seed: u32,
    pub disabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: DEFAULT_SEED,
            disabled: false,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Malformed values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(getenv)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup(SEED_VAR) {
            match parse_u32(SEED_VAR, &value) {
                Ok(seed) => config.seed = seed,
                Err(e) => warn!("{}; keeping seed {}", e, config.seed),
            }
        }
        config.disabled = lookup(DISABLE_VAR).is_some();
        config
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal `u32`.
pub fn parse_u32(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };
    parsed.map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_owned(),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn getenv(key: &str) -> Option<String> {
    let key = std::ffi::CString::new(key).ok()?;
    // SAFETY: `key` is NUL-terminated; the returned string is copied out
    // before anything else can touch the environment.
    unsafe {
        let val = libc::getenv(key.as_ptr());
        if val.is_null() {
            return None;
        }
        Some(std::ffi::CStr::from_ptr(val).to_string_lossy().into_owned())
    }
}

#[cfg(target_arch = "wasm32")]
fn getenv(_key: &str) -> Option<String> {
    None
}
