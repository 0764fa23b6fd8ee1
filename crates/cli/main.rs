use clap::Parser;
use color_eyre::Result;
use config::Config;
use human_panic::setup_panic;
use tracing::{debug, error};

use crate::{
    cli::{Args, Commands},
    errors::RunError,
};

mod cli;
mod context;
mod errors;
mod subcommands;
mod telemetry;
mod worker;

#[tokio::main]
async fn main() -> Result<()> {
    setup_panic!();

    #[cfg(debug_assertions)]
    color_eyre::install()?;

    let args = Args::parse();

    if args.debug {
        std::env::set_var(global_utils::DEBUG_ENV, args.debug.to_string());
    }

    // `.env` may carry RUST_LOG
    let dotenv = dotenvy::dotenv();

    telemetry::init(args.debug)?;

    if let Ok(path) = dotenv {
        debug!("loaded environment from {}", path.display());
    }

    if let Err(e) = run(args).await {
        error!("{e}");
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(args: Args) -> std::result::Result<(), RunError> {
    let config = Config::from_env()?;

    match args.command {
        Commands::Serve { bind } => subcommands::serve(config, bind).await,
        Commands::Report { repositories } => subcommands::report(&config, repositories).await,
    }
}
