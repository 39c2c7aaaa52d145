//! Command-line client for a search cluster

use clap::{Parser, Subcommand};
use searchbox_client::{
    cli::{RequestArgs, ServersArgs},
    init_logger_with_config,
    log_error, log_info,
    ClientSettings,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "searchbox")]
#[command(about = "Inspect and query a search cluster")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to searchbox.yml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the servers the client would use
    #[command(name = "servers")]
    Servers(ServersArgs),

    /// Send a request to the cluster and print the JSON response
    #[command(name = "request")]
    Request(RequestArgs),
}

fn load_settings(cli: &Cli) -> anyhow::Result<ClientSettings> {
    let mut settings = match &cli.config {
        Some(path) => {
            let mut settings = ClientSettings::from_yaml_file(path)?;
            settings.apply_env_overrides();
            settings
        }
        None => ClientSettings::load_config()?,
    };

    if cli.verbose {
        settings.log_level = "debug".to_string();
    } else if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }

    Ok(settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&cli).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {:#}", e);
        std::process::exit(1);
    });

    init_logger_with_config(&settings.log_level, &settings.logging);
    log_info!("📋 Version: {}", env!("CARGO_PKG_VERSION"));

    let outcome = match &cli.command {
        Commands::Servers(args) => args.execute(&settings).await,
        Commands::Request(args) => args.execute(&settings).await,
    };

    if let Err(e) = outcome {
        log_error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
