//! Environment variable parsing helpers
//!
//! Missing variables fall back to a default; present-but-malformed values are
//! reported as errors so misconfiguration fails at startup instead of being
//! silently replaced.

use std::str::FromStr;

/// Parse `key` as `T`, returning `default` when the variable is unset or blank.
///
/// ```ignore
/// let port: u16 = parse_env_or_default("PORT", 8080)?;
/// ```
pub fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, raw, e)),
        _ => Ok(default),
    }
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn parse_env_flag(key: &str, default: bool) -> Result<bool, String> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(format!("Failed to parse {}='{}' as a flag", key, other)),
        },
        _ => Ok(default),
    }
}
