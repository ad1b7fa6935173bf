//! Utility functions for the version reporter

use crate::error::{Result, VersionInfoError};
use std::time::Duration;

/// Environment variable whose presence means we run inside the editor
pub const EMBEDDED_MARKER: &str = "VIM";

/// Whether the process was started from within the host editor
pub fn is_embedded() -> bool {
    std::env::var_os(EMBEDDED_MARKER).is_some()
}

/// Parse a timeout string (e.g., "30s", "2m", "1h")
pub fn parse_timeout(input: &str) -> Result<Duration> {
    let input = input.trim().to_lowercase();

    let invalid = || {
        VersionInfoError::ValidationError(format!(
            "Invalid timeout format: '{}'. Use formats like '30s', '5m', '1h'",
            input
        ))
    };

    let secs = match input.parse::<u64>() {
        Ok(secs) => secs,
        Err(_) => parse_with_unit(&input).ok_or_else(invalid)?,
    };

    if secs == 0 {
        return Err(VersionInfoError::validation("Timeout must be greater than zero"));
    }

    Ok(Duration::from_secs(secs))
}

/// Seconds for a number with an `s`, `m` or `h` suffix
fn parse_with_unit(input: &str) -> Option<u64> {
    let unit = input.chars().last();
    let number = &input[..input.len() - unit.map_or(0, char::len_utf8)];
    let multiplier: u64 = match unit {
        Some('s') => 1,
        Some('m') => 60,
        Some('h') => 3600,
        _ => return None,
    };

    number.parse::<u64>().ok()?.checked_mul(multiplier)
}
