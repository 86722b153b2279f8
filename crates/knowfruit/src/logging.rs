//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use knowfruit_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `level` - Default filter directive when `RUST_LOG` is not set.
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
///
/// # Notes
///
/// - Log output goes to stderr (stdout is reserved for command output)
/// - The RUST_LOG environment variable can override the log level
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(config: &LoggingConfig, verbose_override: bool, json_logs_override: bool) {
    init(
        effective_level(config, verbose_override),
        json_logs_override || config.format == "json",
    );
}

fn effective_level(config: &LoggingConfig, verbose: bool) -> &str {
    match config.level.as_str() {
        "trace" => "trace",
        _ if verbose => "debug",
        "error" | "warn" | "info" | "debug" => config.level.as_str(),
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn test_effective_level_from_config() {
        assert_eq!(effective_level(&logging("warn"), false), "warn");
        assert_eq!(effective_level(&logging("trace"), false), "trace");
    }

    #[test]
    fn test_verbose_raises_to_debug() {
        assert_eq!(effective_level(&logging("warn"), true), "debug");
        assert_eq!(effective_level(&logging("trace"), true), "trace");
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(effective_level(&logging("chatty"), false), "info");
    }
}
