//! # Runtime Configuration Module
//!
//! Environment-variable configuration for the `may` coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `REXROUTE_STACK_SIZE`
//!
//! Stack size for connection coroutines. Accepts decimal (`32768`) or
//! hexadecimal (`0x8000`). Default: `0x8000` (32 KB).
//!
//! Regex matching itself uses little stack, but handlers run on the same
//! coroutine; raise this for handlers with deep call chains.
//!
//! ### `REXROUTE_WORKERS`
//!
//! Number of `may` worker threads. Unset leaves the runtime default.
//!
//! ## Usage
//!
//! ```rust
//! use rexroute::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! ```

use std::env;
use tracing::info;

/// Default coroutine stack size (32 KB)
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    /// Worker thread count, `None` for the runtime default
    pub workers: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            workers: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("REXROUTE_STACK_SIZE").ok().as_deref(),
            env::var("REXROUTE_WORKERS").ok().as_deref(),
        )
    }

    /// Build from raw variable values; invalid values fall back to defaults.
    #[must_use]
    pub fn from_values(stack_size: Option<&str>, workers: Option<&str>) -> Self {
        let stack_size = stack_size
            .and_then(parse_size)
            .unwrap_or(DEFAULT_STACK_SIZE);
        let workers = workers
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0);
        Self {
            stack_size,
            workers,
        }
    }

    /// Apply to the global `may` configuration. Call before starting the server.
    pub fn apply(&self) {
        let config = may::config();
        config.set_stack_size(self.stack_size);
        if let Some(workers) = self.workers {
            config.set_workers(workers);
        }
        info!(
            stack_size = self.stack_size,
            workers = ?self.workers,
            "Coroutine runtime configured"
        );
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
