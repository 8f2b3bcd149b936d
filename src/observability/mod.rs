//! # Observability
//!
//! Logging setup for the `travelbook` binary. Output goes to stderr so
//! command output on stdout stays machine readable.

pub mod logging;

pub use logging::log_client_config;

use tracing_subscriber::EnvFilter;

/// Environment variable selecting `json` or `text` log output
pub const LOG_FORMAT_ENV: &str = "TRAVELBOOK_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Default filter directive for the chosen verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the verbosity
/// default. A subscriber installed earlier (tests) is left in place.
pub fn init_logging(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    // Err only when a subscriber is already installed
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_target(false).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(false, LogFormat::Text);
        init_logging(true, LogFormat::Json);
    }
}
