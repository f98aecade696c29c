//! Logging initialization.
//!
//! Structured logging via `tracing` to stderr, human-readable or JSON, with
//! the level taken from `-v` counts unless `CASEFILE_LOG_LEVEL` overrides it.
//! Stdout is reserved for the game itself.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable overriding the log filter.
pub const LOG_LEVEL_ENV: &str = "CASEFILE_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Maps `-v` count and `--quiet` to a tracing directive.
///
/// - quiet → `"error"`
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolves a color choice against a stream's terminal status and `NO_COLOR`.
#[must_use]
pub fn use_color(color: ColorChoice, is_terminal: bool) -> bool {
    match color {
        ColorChoice::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Initializes the global tracing subscriber.
///
/// Uses `try_init()` so calling this more than once (e.g. in tests) is safe.
pub fn init_logging(format: LogFormat, verbosity: u8, quiet: bool, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity, quiet)));

    let show_target = verbosity >= 2;
    let use_ansi = use_color(color, std::io::stderr().is_terminal());

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_default_is_human() {
        assert_eq!(LogFormat::default(), LogFormat::Human);
    }

    #[test]
    fn init_logging_does_not_panic() {
        init_logging(LogFormat::Human, 0, false, ColorChoice::Auto);
        init_logging(LogFormat::Json, 3, false, ColorChoice::Never);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbosity_to_directive(0, false), "warn");
        assert_eq!(verbosity_to_directive(1, false), "info");
        assert_eq!(verbosity_to_directive(2, false), "debug");
        assert_eq!(verbosity_to_directive(3, false), "trace");
        assert_eq!(verbosity_to_directive(255, false), "trace");
    }

    #[test]
    fn quiet_wins_over_verbosity() {
        assert_eq!(verbosity_to_directive(3, true), "error");
    }

    #[test]
    fn explicit_color_ignores_terminal() {
        assert!(use_color(ColorChoice::Always, false));
        assert!(!use_color(ColorChoice::Never, true));
        assert!(!use_color(ColorChoice::Auto, false));
    }
}
