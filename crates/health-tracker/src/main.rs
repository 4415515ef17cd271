use anyhow::Result;
use clap::Parser;

mod cli;
mod config_cmd;
mod confirm;
mod context;
mod display;
mod entries;
mod exercise_cmd;
mod fasting_cmd;
mod result;
mod soda_cmd;
mod stats;
mod weight_cmd;

use cli::{Cli, Commands};
use context::CommandContext;
use result::CommandResult;
use tracker_config::{CliOverrides, TrackerConfig};
use tracker_core::AppError;

fn main() {
    // Initialize tracing (output to stderr, warnings unless RUST_LOG says otherwise)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init()
        .ok();

    let cli = Cli::parse();
    let format = cli.format;

    let code = match run(cli) {
        Ok(result) => {
            display::print_result(&result, format);
            result.exit_code()
        }
        Err(err) => {
            display::print_error(&err, format);
            exit_code(&err)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<CommandResult> {
    let overrides = CliOverrides {
        data_dir: cli.data_dir,
        test_mode: cli.test_mode,
        allow_future: cli.allow_future,
    };
    let config = TrackerConfig::load(&overrides).map_err(|e| AppError::Config(format!("{e:#}")));

    // Config commands must work even when the config file is broken.
    match cli.command {
        Commands::Config { cmd } => config_cmd::handle(cmd, config.map_err(Into::into)),
        Commands::Weight { cmd } => Ok(weight_cmd::handle(&context(config, cli.yes)?, cmd)?),
        Commands::Exercise { cmd } => Ok(exercise_cmd::handle(&context(config, cli.yes)?, cmd)?),
        Commands::Fasting { cmd } => Ok(fasting_cmd::handle(&context(config, cli.yes)?, cmd)?),
        Commands::Soda { cmd } => Ok(soda_cmd::handle(&context(config, cli.yes)?, cmd)?),
    }
}

fn context(
    config: Result<TrackerConfig, AppError>,
    assume_yes: bool,
) -> Result<CommandContext, AppError> {
    Ok(CommandContext::from_config(&config?, assume_yes)?)
}

/// 1 for user-correctable failures, 2 for storage and anything unexpected.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AppError>().map_or(2, AppError::exit_code)
}
