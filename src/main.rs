mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
#[cfg(test)]
mod test_support;
mod workflow;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::parse::{self, ParseCommandArgs};
use crate::config::SettingsStore;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::infra::provider::ProviderAdapter;

/// Environment variables consulted, in order, for the built-in Gemini key.
const BUILTIN_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Exit status when no ticket could be recognized.
const EXIT_UNRECOGNIZED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "journey",
    author,
    version,
    about = "Turn travel SMS and confirmation emails into journey card data"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this settings file instead of the default location.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize a ticket from free text and print it as JSON.
    Parse(ParseArgs),
    /// Manage provider settings.
    Config(ConfigArgs),
}

#[derive(Args)]
struct ParseArgs {
    /// Ticket text; read from stdin when omitted.
    text: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let store = match cli.config {
        Some(path) => SettingsStore::at(path),
        None => SettingsStore::default_location()?,
    };

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(&store, args.command)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Parse(args) => run_parse(store, args).await,
    }
}

fn init_logging(verbose: u8) -> AppResult<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| AppError::Configuration(format!("failed to install logger: {err}")))
}

fn builtin_api_key() -> Option<String> {
    BUILTIN_KEY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

async fn run_parse(store: SettingsStore, args: ParseArgs) -> AppResult<ExitCode> {
    let extractor = Arc::new(ProviderAdapter::new(builtin_api_key()));
    let context = AppContext::new(store, extractor);

    match parse::run(&context, ParseCommandArgs { text: args.text }).await? {
        Some(ticket) => {
            let json = serde_json::to_string_pretty(&ticket).map_err(|err| {
                AppError::Configuration(format!("failed to encode ticket: {err}"))
            })?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Could not recognize a ticket in the text; please fill in the card manually.");
            Ok(ExitCode::from(EXIT_UNRECOGNIZED))
        }
    }
}
