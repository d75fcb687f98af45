use std::env;

use log::*;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Read an environment variable, falling back to `default` (and saying so in the logs) when it is missing or empty.
/// Secrets must not be read through this function, since the default is logged.
pub fn env_or_default(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(s) if !s.trim().is_empty() => s,
        _ => {
            warn!("🪛️ {name} is not set. Using the default value, '{default}'.");
            default.to_string()
        },
    }
}
