//! CLI argument definitions
//!
//! All Clap derive structs for `casefile` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::persistence::DEFAULT_SAVE_DIR;

/// Default pacing cadence for autoplay, in milliseconds.
pub const DEFAULT_PACE_MS: u64 = 1400;

// ============================================================================
// Root CLI
// ============================================================================

/// Case-file investigation engine for the terminal.
#[derive(Parser, Debug)]
#[command(name = "casefile", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "CASEFILE_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a case in the terminal.
    Play(PlayArgs),

    /// Validate case files without playing them.
    Validate(ValidateArgs),

    /// List the cases a library offers.
    List(ListArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

/// Arguments for `play`.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Case library directory (built-in cases when omitted).
    #[arg(long, env = "CASEFILE_LIBRARY")]
    pub library: Option<PathBuf>,

    /// Open this case immediately instead of showing the case list.
    #[arg(long)]
    pub case: Option<String>,

    /// Start with autoplay on.
    #[arg(long)]
    pub autoplay: bool,

    /// Autoplay cadence in milliseconds.
    #[arg(
        long,
        default_value_t = DEFAULT_PACE_MS,
        env = "CASEFILE_PACE_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub pace_ms: u64,

    /// Write structured JSONL events to this file.
    #[arg(long, env = "CASEFILE_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Directory for the save blob.
    #[arg(long, default_value = DEFAULT_SAVE_DIR, env = "CASEFILE_SAVE_DIR")]
    pub save_dir: PathBuf,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Case files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case library directory (built-in cases when omitted).
    #[arg(long, env = "CASEFILE_LIBRARY")]
    pub library: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn play_args(cli: Cli) -> PlayArgs {
        match cli.command {
            Commands::Play(args) => args,
            other => panic!("expected play, got {other:?}"),
        }
    }

    #[test]
    fn test_play_defaults() {
        let cli = Cli::try_parse_from(["casefile", "play"]).unwrap();
        let args = play_args(cli);
        assert_eq!(args.pace_ms, DEFAULT_PACE_MS);
        assert_eq!(args.save_dir, PathBuf::from(DEFAULT_SAVE_DIR));
        assert!(!args.autoplay);
        assert!(args.case.is_none());
    }

    #[test]
    fn test_play_with_case_and_autoplay() {
        let cli = Cli::try_parse_from([
            "casefile",
            "play",
            "--case",
            "night-shift",
            "--autoplay",
            "--pace-ms",
            "200",
        ])
        .unwrap();
        let args = play_args(cli);
        assert_eq!(args.case.as_deref(), Some("night-shift"));
        assert!(args.autoplay);
        assert_eq!(args.pace_ms, 200);
    }

    #[test]
    fn test_zero_pace_rejected() {
        let result = Cli::try_parse_from(["casefile", "play", "--pace-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["casefile", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["casefile", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["casefile", "--color", variant, "list"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_validate_requires_files() {
        let result = Cli::try_parse_from(["casefile", "validate"]);
        assert!(result.is_err(), "Expected error for missing files");
    }

    #[test]
    fn test_validate_strict_json() {
        let cli = Cli::try_parse_from([
            "casefile", "validate", "a.yaml", "b.yaml", "--strict", "--format", "json",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.files.len(), 2);
        assert!(args.strict);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["casefile", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_verbose_count_is_global() {
        let cli = Cli::try_parse_from(["casefile", "list", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["casefile", "--quiet", "list"]).unwrap();
        assert!(cli.quiet);
    }
}
