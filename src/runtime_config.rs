//! # Runtime Configuration
//!
//! Coroutine runtime settings read from the environment.
//!
//! ### `CONTACT_US_STACK_SIZE`
//!
//! Stack size for the coroutine serving each connection. Accepts decimal
//! (`32768`) or hexadecimal (`0x8000`). Default: `0x8000` (32 KB), enough
//! for template rendering plus a store write.
//!
//! ```bash
//! export CONTACT_US_STACK_SIZE=0x10000
//! contact-us serve
//! ```

use std::env;

pub const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        env::var("CONTACT_US_STACK_SIZE")
            .ok()
            .map(|val| Self {
                stack_size: parse_stack_size(&val),
            })
            .unwrap_or_default()
    }

    /// Apply to the global `may` scheduler. Call before starting the server.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

fn parse_stack_size(val: &str) -> usize {
    let val = val.trim();
    let parsed = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    };
    parsed.filter(|size| *size > 0).unwrap_or(DEFAULT_STACK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stack_size() {
        assert_eq!(parse_stack_size("0x4000"), 0x4000);
        assert_eq!(parse_stack_size("0X10000"), 0x10000);
        assert_eq!(parse_stack_size("65536"), 65536);
        assert_eq!(parse_stack_size(" 4096 "), 4096);
        assert_eq!(parse_stack_size("0"), DEFAULT_STACK_SIZE);
        assert_eq!(parse_stack_size("lots"), DEFAULT_STACK_SIZE);
        assert_eq!(parse_stack_size("0xZZ"), DEFAULT_STACK_SIZE);
    }
}
