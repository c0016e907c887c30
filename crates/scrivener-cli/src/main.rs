//! Scrivener CLI - quality-gated proofreading for plain-text documents.

use clap::Parser;
use scrivener_cli::commands;
use scrivener_cli::cli::{ConfigAction, ConfigArgs};
use scrivener_cli::{Cli, Command, Config, Formatter, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Exit status of a run that finished below the success-rate threshold.
const EXIT_RUN_FAILED: i32 = 2;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> scrivener_cli::Result<i32> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config (init writes a fresh file, so it never reads one)
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let config = match &cli.command {
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. },
        }) => Config::default(),
        _ => Config::load(cli.config.as_deref())?,
    };

    // Create formatter
    let format = cli.format.map(OutputFormat::from).unwrap_or_default();
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Proofread(args) => {
            let report = commands::execute_proofread(args, &config, &formatter).await?;
            if report.is_completed() {
                Ok(0)
            } else {
                Ok(EXIT_RUN_FAILED)
            }
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
            Ok(0)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
