//! Factory assembling a [`SearchClient`] from a [`ClientConfig`]

use crate::client::codec::{DefaultJsonCodec, JsonCodec};
use crate::client::connection::{BasicConnectionManager, ConnectionManager, PoolingConnectionManager};
use crate::client::request_config::RequestConfig;
use crate::client::route::ServerList;
use crate::client::SearchClient;
use crate::config::ClientConfig;
use crate::discovery::NodeChecker;
use crate::error::Result;
use crate::{log_debug, log_info};
use std::sync::Arc;

/// Server used when the factory has no configuration
pub const DEFAULT_SERVER: &str = "http://localhost:9200";

/// Creates independent [`SearchClient`] instances.
///
/// Every call to [`create`](ClientFactory::create) builds a new client with its
/// own connection manager and, when enabled, its own discovery task.
#[derive(Debug, Default, Clone)]
pub struct ClientFactory {
    client_config: Option<ClientConfig>,
}

impl ClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            client_config: Some(config),
        }
    }

    pub fn set_client_config(&mut self, config: ClientConfig) {
        self.client_config = Some(config);
    }

    pub fn client_config(&self) -> Option<&ClientConfig> {
        self.client_config.as_ref()
    }

    /// Create a client.
    ///
    /// With discovery enabled this waits for the first discovery run to
    /// finish before returning; later runs happen in the background.
    pub async fn create(&self) -> Result<SearchClient> {
        let Some(config) = &self.client_config else {
            log_debug!("There is no configuration to create http client. Creating simple client with default values");
            let servers: ServerList = [DEFAULT_SERVER].into_iter().collect();
            return Ok(SearchClient::new(
                servers,
                ConnectionManager::Basic(BasicConnectionManager::new()),
                RequestConfig::DEFAULT,
                Arc::new(DefaultJsonCodec),
            ));
        };

        log_debug!("Creating HTTP client based on configuration");

        let request_config = RequestConfig::from_millis(config.conn_timeout(), config.read_timeout());
        let connection_manager = Self::connection_manager(config);
        connection_manager.log_connection_stats();

        let json_codec: Arc<dyn JsonCodec> = match config.json_codec() {
            Some(codec) => Arc::clone(codec),
            None => Arc::new(DefaultJsonCodec),
        };

        let client = SearchClient::new(config.servers().clone(), connection_manager, request_config, json_codec);

        // Discovery goes last: its first run already sends requests through the client.
        if config.is_discovery_enabled() {
            log_info!("🔍 Node Discovery Enabled...");
            let node_checker = NodeChecker::new(config, &client)?;
            client.set_node_checker(node_checker.start_and_wait().await);
        } else {
            log_info!("Node Discovery Disabled...");
        }

        Ok(client)
    }

    fn connection_manager(config: &ClientConfig) -> ConnectionManager {
        if !config.is_multi_threaded() {
            log_debug!("Default http client is created without multi threaded option");
            return ConnectionManager::Basic(BasicConnectionManager::new());
        }

        let mut manager = PoolingConnectionManager::new();

        if let Some(max_total) = config.max_total_connection() {
            manager.set_max_total(max_total);
        }

        if let Some(default_max_per_route) = config.default_max_total_connection_per_route() {
            manager.set_default_max_per_route(default_max_per_route);
        }

        for (route, max) in config.max_total_connection_per_route() {
            manager.set_max_per_route(route.clone(), *max);
        }

        log_debug!("Multi Threaded http client created");
        ConnectionManager::Pooling(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::route::HttpRoute;
    use std::time::Duration;

    #[tokio::test]
    async fn test_no_config_uses_defaults() {
        let client = ClientFactory::new().create().await.unwrap();
        let servers = client.servers();
        assert_eq!(servers.len(), 1);
        assert!(servers.contains(DEFAULT_SERVER));
        assert!(!client.connection_manager().is_pooling());
        assert_eq!(*client.default_request_config(), RequestConfig::DEFAULT);
        assert!(client.node_checker().is_none());
    }

    #[tokio::test]
    async fn test_timeouts_are_applied() {
        let config = ClientConfig::builder("someUri").conn_timeout(150).read_timeout(300).build();
        let client = ClientFactory::with_config(config).create().await.unwrap();
        let request_config = client.default_request_config();
        assert_eq!(request_config.connect_timeout, Some(Duration::from_millis(150)));
        assert_eq!(request_config.read_timeout, Some(Duration::from_millis(300)));
    }

    #[tokio::test]
    async fn test_pooling_manager_sizing() {
        let route_one = HttpRoute::new("http", "test.localhost", 80);
        let route_two = HttpRoute::new("http", "localhost", 80);
        let config = ClientConfig::builder("http://localhost:9200")
            .multi_threaded(true)
            .max_total_connection(20)
            .default_max_total_connection_per_route(10)
            .max_total_connection_per_route(route_one.clone(), 5)
            .max_total_connection_per_route(route_two.clone(), 6)
            .build();

        let client = ClientFactory::with_config(config).create().await.unwrap();
        let manager = client.connection_manager().as_pooling().expect("pooling manager");
        assert_eq!(manager.max_total(), 20);
        assert_eq!(manager.default_max_per_route(), 10);
        assert_eq!(manager.max_per_route(&route_one), 5);
        assert_eq!(manager.max_per_route(&route_two), 6);
    }

    #[tokio::test]
    async fn test_pooling_without_sizing_keeps_manager_defaults() {
        let config = ClientConfig::builder("http://localhost:9200").multi_threaded(true).build();
        let client = ClientFactory::with_config(config).create().await.unwrap();
        let manager = client.connection_manager().as_pooling().unwrap();
        assert_eq!(manager.max_total(), crate::client::connection::DEFAULT_MAX_TOTAL);
        assert_eq!(manager.default_max_per_route(), crate::client::connection::DEFAULT_MAX_PER_ROUTE);
    }

    #[tokio::test]
    async fn test_custom_codec_is_attached() {
        let codec: Arc<dyn JsonCodec> = Arc::new(crate::client::codec::PrettyJsonCodec);
        let config = ClientConfig::builder("http://localhost:9200")
            .json_codec(Arc::clone(&codec))
            .build();
        let client = ClientFactory::with_config(config).create().await.unwrap();
        assert!(Arc::ptr_eq(client.json_codec(), &codec));
    }

    #[test]
    fn test_set_client_config() {
        let mut factory = ClientFactory::new();
        assert!(factory.client_config().is_none());
        factory.set_client_config(ClientConfig::builder("http://localhost:9200").build());
        assert!(factory.client_config().is_some());
    }
}
