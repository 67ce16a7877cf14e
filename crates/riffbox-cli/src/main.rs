//! Riffbox CLI - offline processing front end for the amp engine.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "riffbox")]
#[command(author, version, about = "Riffbox amp voicing engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the amp engine
    Process(commands::process::ProcessArgs),

    /// List the available voicing modes
    Modes(commands::modes::ModesArgs),

    /// Display WAV file information
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Modes(args) => commands::modes::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
