//! `servers` subcommand

use crate::cli::create_client;
use crate::config::ClientSettings;
use anyhow::Result;
use clap::Args;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ServersArgs {
    /// Run node discovery once before printing, even if the settings disable it
    #[arg(long, default_value = "false")]
    pub discover: bool,
}

impl ServersArgs {
    /// Apply CLI flags on top of the loaded settings
    pub fn apply(&self, settings: &ClientSettings) -> ClientSettings {
        let mut settings = settings.clone();
        if self.discover {
            settings.discovery_enabled = true;
        }
        settings
    }

    /// Create a client and print its server list, one per line
    pub async fn execute(&self, settings: &ClientSettings) -> Result<()> {
        let settings = self.apply(settings);
        debug!("Listing servers (discovery: {})", settings.discovery_enabled);

        let client = create_client(&settings).await?;
        for server in client.servers().iter() {
            println!("{}", server);
        }

        if let Some(checker) = client.node_checker() {
            let stats = checker.stats();
            if let Some(error) = stats.last_error {
                eprintln!("discovery failed: {}", error);
            }
        }

        client.shutdown().await;
        Ok(())
    }
}
