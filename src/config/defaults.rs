//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default period between interface updates, in milliseconds.
pub const UPDATE_INTERVAL_MS: u64 = 500;

/// Default period between full table prints, in milliseconds.
pub const PRINT_INTERVAL_MS: u64 = 5000;

/// Default output path for `ifwatch init`.
pub const CONFIG_FILE: &str = "ifwatch.toml";

/// Default update interval as Duration.
#[must_use]
pub const fn update_interval() -> Duration {
    Duration::from_millis(UPDATE_INTERVAL_MS)
}

/// Default print interval as Duration.
#[must_use]
pub const fn print_interval() -> Duration {
    Duration::from_millis(PRINT_INTERVAL_MS)
}
