//! Command-line interface for inspecting and querying a cluster

pub mod request;
pub mod servers;

pub use request::RequestArgs;
pub use servers::ServersArgs;

use crate::client::{ClientFactory, SearchClient};
use crate::config::ClientSettings;
use anyhow::{Context, Result};

/// Build a client from settings, the way every subcommand does
pub async fn create_client(settings: &ClientSettings) -> Result<SearchClient> {
    let config = settings
        .to_client_config()
        .context("Invalid client settings")?;
    ClientFactory::with_config(config)
        .create()
        .await
        .context("Failed to create search client")
}
