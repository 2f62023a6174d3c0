//! versioned-kv: main entry point

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use versioned_kv::cli::{run_demo, Cli, Commands, ScriptRunner};
use versioned_kv::config::{LogConfig, LogFormat, StoreConfig};
use versioned_kv::error::Result;

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match log.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = StoreConfig::load_or_default(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
    init_tracing(&config.log);

    match cli.command {
        Commands::Demo => {
            run_demo(io::stdout().lock())?;
            Ok(())
        }
        Commands::Run { script } => {
            let mut runner = ScriptRunner::new(config.compaction);
            let stdout = io::stdout().lock();
            let summary = if script.as_os_str() == "-" {
                runner.run(io::stdin().lock(), stdout)?
            } else {
                info!(script = %script.display(), "running script");
                runner.run(BufReader::new(File::open(&script)?), stdout)?
            };
            info!(
                commands = summary.commands,
                outputs = summary.outputs,
                "done"
            );
            Ok(())
        }
    }
}
