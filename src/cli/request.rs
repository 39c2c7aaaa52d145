//! `request` subcommand

use crate::cli::create_client;
use crate::client::RawAction;
use crate::config::ClientSettings;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use hyper::Method;
use serde_json::Value;

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, DELETE, HEAD)
    pub method: String,

    /// Path relative to the server root, e.g. `_cluster/health`
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,
}

impl RequestArgs {
    /// Convert CLI arguments to an action
    pub fn to_action(&self) -> Result<RawAction> {
        let method = Method::from_bytes(self.method.to_uppercase().as_bytes())
            .map_err(|e| anyhow!("Invalid method '{}': {}", self.method, e))?;

        let mut action = RawAction::new(method, self.path.clone());
        if let Some(body) = &self.body {
            let body: Value = serde_json::from_str(body).context("Request body is not valid JSON")?;
            action = action.with_body(body);
        }
        Ok(action)
    }

    /// Execute the request and print the response JSON
    pub async fn execute(&self, settings: &ClientSettings) -> Result<()> {
        let action = self.to_action()?;
        let client = create_client(settings).await?;

        let result = client.execute(&action).await;
        client.shutdown().await;
        let result = result.context("Request failed")?;

        println!("{}", serde_json::to_string_pretty(&result.json)?);

        if !result.succeeded {
            return Err(anyhow!(
                "{} {}",
                result.status,
                result.error_message.unwrap_or_default()
            ));
        }
        Ok(())
    }
}
