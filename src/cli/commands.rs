//! CLI commands

use crate::config::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// versioned-kv CLI
#[derive(Debug, Parser)]
#[command(name = "versioned-kv")]
#[command(about = "In-memory time-versioned key-value store")]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format, overriding the configuration file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the built-in walkthrough and print each step
    Demo,
    /// Execute a JSON Lines command script
    Run {
        /// Script path, or `-` for stdin
        script: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["versioned-kv", "run", "ops.jsonl", "--log-format", "json"])
            .unwrap();

        assert_eq!(cli.log_format, Some(LogFormat::Json));
        match cli.command {
            Commands::Run { script } => assert_eq!(script, PathBuf::from("ops.jsonl")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_demo_with_config() {
        let cli = Cli::try_parse_from(["versioned-kv", "--config", "kv.json", "demo"]).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("kv.json")));
        assert!(matches!(cli.command, Commands::Demo));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["versioned-kv", "demo", "--log-format", "xml"]).is_err());
    }
}
