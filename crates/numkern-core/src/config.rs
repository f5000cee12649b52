//! Tuning knobs for the blocked and recursive kernels.
//!
//! None of these change results, only how work is partitioned. Every kernel
//! entry point has a `*_with(&KernelConfig)` form; the plain form uses
//! [`KernelConfig::default`].

use crate::error::{CoreError, Result};

/// Environment variable overriding [`KernelConfig::transpose_base`].
pub const TRANSPOSE_BASE_ENV: &str = "NUMKERN_TRANSPOSE_BASE";
/// Environment variable overriding [`KernelConfig::pairwise_base`].
pub const PAIRWISE_BASE_ENV: &str = "NUMKERN_PAIRWISE_BASE";
/// Environment variable overriding [`KernelConfig::flip_block_min`].
pub const FLIP_BLOCK_MIN_ENV: &str = "NUMKERN_FLIP_BLOCK_MIN";

/// Block sizes and recursion cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelConfig {
    /// Element budget of one transpose leaf block. Matrices with at most
    /// `4 * transpose_base` elements are transposed directly.
    pub transpose_base: usize,
    /// Length below which a pairwise cumulative reduction runs
    /// sequentially. Must be at least 2.
    pub pairwise_base: usize,
    /// Contiguous run length above which `flipdim` moves whole runs with a
    /// slice copy instead of element by element.
    pub flip_block_min: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            transpose_base: 64,
            pairwise_base: 128,
            flip_block_min: 200,
        }
    }
}

impl KernelConfig {
    /// Defaults overridden by any `NUMKERN_*` environment variables that are
    /// set.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            transpose_base: parse_knob(
                TRANSPOSE_BASE_ENV,
                std::env::var(TRANSPOSE_BASE_ENV).ok().as_deref(),
                defaults.transpose_base,
            )?,
            pairwise_base: parse_knob(
                PAIRWISE_BASE_ENV,
                std::env::var(PAIRWISE_BASE_ENV).ok().as_deref(),
                defaults.pairwise_base,
            )?,
            flip_block_min: parse_knob(
                FLIP_BLOCK_MIN_ENV,
                std::env::var(FLIP_BLOCK_MIN_ENV).ok().as_deref(),
                defaults.flip_block_min,
            )?,
        };
        config.validate()?;
        log::debug!("kernel config from environment: {config:?}");
        Ok(config)
    }

    /// Check the invariants the kernels rely on.
    pub fn validate(&self) -> Result<()> {
        if self.transpose_base == 0 {
            return Err(CoreError::InvalidConfig {
                key: TRANSPOSE_BASE_ENV,
                value: self.transpose_base.to_string(),
            });
        }
        if self.pairwise_base < 2 {
            return Err(CoreError::InvalidConfig {
                key: PAIRWISE_BASE_ENV,
                value: self.pairwise_base.to_string(),
            });
        }
        Ok(())
    }
}

/// Parse one knob: unset keeps the default, anything that is not a positive
/// integer is an error.
fn parse_knob(key: &'static str, raw: Option<&str>, default: usize) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(CoreError::InvalidConfig {
            key,
            value: raw.to_string(),
        }),
    }
}
