mod cli;
mod commands;
mod config;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use engine_logging::{engine_error, level_from_verbosity, LogDestination};

use cli::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, level_from_verbosity(cli.verbose));

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config = AppConfig::load(&cli.config)?;
            let home = match cli.home {
                Some(home) => home,
                None => config.home()?,
            };
            commands::run(&config, &home).await
        }
        Command::Status => {
            let (home, configured) = home_and_collections(cli.home, &cli.config)?;
            commands::status(&home, &configured);
            Ok(())
        }
        Command::Reset(args) => {
            let (home, _) = home_and_collections(cli.home, &cli.config)?;
            commands::reset(&home, &args)?;
            Ok(())
        }
    }
}

/// `--home` alone is enough for state commands; otherwise the config decides.
fn home_and_collections(
    home: Option<PathBuf>,
    config_path: &std::path::Path,
) -> anyhow::Result<(PathBuf, Vec<String>)> {
    match (home, AppConfig::load(config_path)) {
        (Some(home), Ok(config)) => Ok((home, config.collections)),
        (Some(home), Err(_)) => Ok((home, Vec::new())),
        (None, Ok(config)) => Ok((config.home()?, config.collections)),
        (None, Err(err)) => Err(err.into()),
    }
}
