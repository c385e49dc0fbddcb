use clap::Parser;
use contabook::args::{Args, Command};
use contabook::commands::load_config;
use contabook::{commands, error_type, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            error_type(&e)
                .map(|t| t.exit_code())
                .unwrap_or(ExitCode::FAILURE)
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.fallback_year())
            .await?
            .print(),

        Command::Import(import_args) => {
            let config = load_config(home).await?;
            commands::import(config, import_args).await?.print()
        }

        Command::Vat(period) => {
            let config = load_config(home).await?;
            commands::vat(config, *period).await?.print()
        }

        Command::Entries(entries_args) => {
            let config = load_config(home).await?;
            commands::entries(config, entries_args).await?.print()
        }

        Command::Purchases(list_args) => {
            let config = load_config(home).await?;
            commands::purchases(config, list_args).await?.print()
        }

        Command::Sales(list_args) => {
            let config = load_config(home).await?;
            commands::sales(config, list_args).await?.print()
        }

        Command::Status => commands::status(load_config(home).await?).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
