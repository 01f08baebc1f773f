//! Structured logging setup.
//!
//! Everything in the service logs through `tracing`. This module wires the
//! subscriber: an `EnvFilter`, a JSON or pretty `fmt` layer, and optionally a
//! non-blocking writer so slow stdout never stalls a request coroutine.
//!
//! Visitor email addresses are personal data. Call sites pass them through
//! [`redact_email`] with the configured [`RedactionLevel`] before logging.
//!
//! ## Environment Variables
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `CONTACT_US_LOG_LEVEL` | trace/debug/info/warn/error | `info` |
//! | `CONTACT_US_LOG_FORMAT` | json/pretty | `json` |
//! | `CONTACT_US_LOG_REDACT_LEVEL` | none/credentials/full | `credentials` |
//! | `CONTACT_US_LOG_ASYNC` | true/false | `true` |
//! | `CONTACT_US_LOG_TARGET_FILTER` | comma-separated directives | unset |
//! | `CONTACT_US_LOG_INCLUDE_LOCATION` | true/false | `false` |
//!
//! `RUST_LOG`, when set, replaces the level-based filter entirely.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Redaction level for sensitive data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactionLevel {
    /// No redaction (dev only)
    None,
    /// Redact credentials; emails are shown with the local part masked
    #[default]
    Credentials,
    /// Redact credentials + PII; emails are hidden entirely
    Full,
}

impl RedactionLevel {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => RedactionLevel::None,
            "full" => RedactionLevel::Full,
            _ => RedactionLevel::Credentials,
        }
    }
}

/// Mask an email address for logging.
///
/// - `None`: unchanged
/// - `Credentials`: first character of the local part kept, `j***@example.com`
/// - `Full`: `[REDACTED]`
pub fn redact_email(email: &str, level: RedactionLevel) -> String {
    match level {
        RedactionLevel::None => email.to_string(),
        RedactionLevel::Full => "[REDACTED]".to_string(),
        RedactionLevel::Credentials => match email.split_once('@') {
            Some((local, domain)) => {
                let first: String = local.chars().take(1).collect();
                format!("{first}***@{domain}")
            }
            None => "***".to_string(),
        },
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub redact_level: RedactionLevel,
    /// Write through a background thread instead of blocking on stdout
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("CONTACT_US_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("CONTACT_US_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            redact_level: RedactionLevel::parse(
                &env::var("CONTACT_US_LOG_REDACT_LEVEL")
                    .unwrap_or_else(|_| "credentials".to_string()),
            ),
            async_logging: env::var("CONTACT_US_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            target_filter: env::var("CONTACT_US_LOG_TARGET_FILTER").ok(),
            include_location: env::var("CONTACT_US_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Configuration for local development and tests
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            redact_level: RedactionLevel::None,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        // Client disconnects are reported by may_minihttp at debug/info; keep warn+.
        if let Ok(directive) = "may_minihttp=warn".parse() {
            env_filter = env_filter.add_directive(directive);
        }

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {}", filter),
                }
            }
        }
        env_filter
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        let fmt_layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(non_blocking)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(non_blocking)
                .boxed(),
        };
        registry
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize async logging")?;

        // The guard flushes on drop; the subscriber lives for the whole process.
        std::mem::forget(guard);
    } else {
        let fmt_layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .boxed(),
        };
        registry
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize sync logging")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers_fall_back_to_defaults() {
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Json);
        assert_eq!(RedactionLevel::parse("none"), RedactionLevel::None);
        assert_eq!(RedactionLevel::parse("Full"), RedactionLevel::Full);
        assert_eq!(RedactionLevel::parse("???"), RedactionLevel::Credentials);
    }

    #[test]
    fn test_redact_email() {
        let email = "jane@example.com";
        assert_eq!(redact_email(email, RedactionLevel::None), email);
        assert_eq!(
            redact_email(email, RedactionLevel::Credentials),
            "j***@example.com"
        );
        assert_eq!(redact_email(email, RedactionLevel::Full), "[REDACTED]");
        assert_eq!(redact_email("nope", RedactionLevel::Credentials), "***");
        assert_eq!(redact_email("", RedactionLevel::Credentials), "***");
    }

    #[test]
    fn test_level_parsing() {
        let mut config = LogConfig::default_dev();
        assert_eq!(config.level(), Level::DEBUG);
        config.log_level = "bogus".to_string();
        assert_eq!(config.level(), Level::INFO);
    }
}
