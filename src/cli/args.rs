//! CLI argument definitions
//!
//! All Clap derive structs for `arenaloop` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Recurring competitive event lifecycle engine.
#[derive(Parser, Debug)]
#[command(name = "arenaloop", author, version, about)]
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
    #[arg(long, default_value = "auto", global = true, env = "ARENALOOP_COLOR")]
    pub color: ColorChoice,
}

impl Cli {
    /// Log format requested by the active subcommand.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        match &self.command {
            Commands::Run(args) => args.log_format,
            Commands::Validate(_) | Commands::Completions(_) => LogFormat::Human,
        }
    }
}

/// Color output preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the lifecycle engine.
    Run(RunArgs),

    /// Validate configuration files without starting the engine.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

// ============================================================================
// Run Command
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the YAML configuration file.
    #[arg(short, long, env = "ARENALOOP_CONFIG")]
    pub config: PathBuf,

    /// Tick period (e.g. "1s", "500ms").
    #[arg(long, default_value = "1s", value_parser = parse_tick)]
    pub tick: Duration,

    /// Expose Prometheus metrics on `127.0.0.1:<port>`.
    #[arg(long, env = "ARENALOOP_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Write the JSONL lifecycle journal to this path.
    #[arg(long, env = "ARENALOOP_JOURNAL")]
    pub journal: Option<PathBuf>,

    /// Log output format.
    #[arg(long, default_value = "human", value_enum)]
    pub log_format: LogFormat,
}

fn parse_tick(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

// ============================================================================
// Validate Command
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

// ============================================================================
// Completions Command
// ============================================================================

/// Arguments for `completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "arenaloop",
            "run",
            "--config",
            "engine.yaml",
            "--tick",
            "250ms",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("engine.yaml"));
                assert_eq!(args.tick, Duration::from_millis(250));
                assert!(args.metrics_port.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_config_for_run() {
        // No --config flag and no env fallback set in tests
        let result = Cli::try_parse_from(["arenaloop", "run"]);
        if std::env::var_os("ARENALOOP_CONFIG").is_none() {
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_cli_parses_validate_with_files() {
        let cli =
            Cli::try_parse_from(["arenaloop", "validate", "a.yaml", "b.yaml"]).unwrap();
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.files.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_validate_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["arenaloop", "validate"]).is_err());
    }

    #[test]
    fn test_bad_tick_duration_rejected() {
        let result = Cli::try_parse_from([
            "arenaloop",
            "run",
            "--config",
            "engine.yaml",
            "--tick",
            "not-a-duration",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from([
            "arenaloop",
            "-vv",
            "validate",
            "a.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
