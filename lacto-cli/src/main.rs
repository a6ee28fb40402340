use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{open_ledger, CalcCommand, ConfigCommand, DataCommand, FermentCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "lacto")]
#[command(version)]
#[command(about = "Salt brine calculator and ferment log", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Work out how much salt a brine needs
    Calc(CalcCommand),

    /// Log, list and manage ferments
    Ferment(FermentCommand),

    /// Import, export or clear the ferment log
    Data(DataCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so JSON output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lacto=warn,lacto_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;
    tracing::debug!(data_dir = %config.data_dir.value.display(), "Loaded configuration");

    execute_command(&cli.command, &config, cli_config_path)
}

fn execute_command(
    command: &Option<Commands>,
    config: &Config,
    cli_config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Some(Commands::Calc(cmd)) => {
            cmd.run()?;
        }
        Some(Commands::Ferment(cmd)) => {
            let mut ledger = open_ledger(config)?;
            cmd.run(&mut ledger, config)?;
        }
        Some(Commands::Data(cmd)) => {
            let mut ledger = open_ledger(config)?;
            cmd.run(&mut ledger)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
