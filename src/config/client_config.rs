//! Client configuration and its builder

use crate::client::codec::JsonCodec;
use crate::client::route::{HttpRoute, ServerList};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default connect and read timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Default interval between node discovery runs
pub const DEFAULT_DISCOVERY_FREQUENCY: Duration = Duration::from_secs(10);

/// Immutable client configuration, produced by [`ClientConfigBuilder::build`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    servers: ServerList,
    multi_threaded: bool,
    max_total_connection: Option<usize>,
    default_max_total_connection_per_route: Option<usize>,
    max_total_connection_per_route: HashMap<HttpRoute, usize>,
    discovery_enabled: bool,
    discovery_frequency: Duration,
    json_codec: Option<Arc<dyn JsonCodec>>,
    conn_timeout: u64,
    read_timeout: u64,
}

impl ClientConfig {
    /// Start a builder with a single server
    pub fn builder(server: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(server)
    }

    pub fn servers(&self) -> &ServerList {
        &self.servers
    }

    pub fn is_multi_threaded(&self) -> bool {
        self.multi_threaded
    }

    pub fn max_total_connection(&self) -> Option<usize> {
        self.max_total_connection
    }

    pub fn default_max_total_connection_per_route(&self) -> Option<usize> {
        self.default_max_total_connection_per_route
    }

    pub fn max_total_connection_per_route(&self) -> &HashMap<HttpRoute, usize> {
        &self.max_total_connection_per_route
    }

    pub fn is_discovery_enabled(&self) -> bool {
        self.discovery_enabled
    }

    pub fn discovery_frequency(&self) -> Duration {
        self.discovery_frequency
    }

    pub fn json_codec(&self) -> Option<&Arc<dyn JsonCodec>> {
        self.json_codec.as_ref()
    }

    /// Connect timeout in milliseconds
    pub fn conn_timeout(&self) -> u64 {
        self.conn_timeout
    }

    /// Read timeout in milliseconds
    pub fn read_timeout(&self) -> u64 {
        self.read_timeout
    }
}

/// Mutable staging object for [`ClientConfig`].
///
/// Values are taken as given: empty server lists or zero timeouts are not
/// rejected here.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    servers: ServerList,
    multi_threaded: bool,
    max_total_connection: Option<usize>,
    default_max_total_connection_per_route: Option<usize>,
    max_total_connection_per_route: HashMap<HttpRoute, usize>,
    discovery_enabled: bool,
    discovery_frequency: Duration,
    json_codec: Option<Arc<dyn JsonCodec>>,
    conn_timeout: u64,
    read_timeout: u64,
}

impl ClientConfigBuilder {
    fn empty() -> Self {
        Self {
            servers: ServerList::new(),
            multi_threaded: false,
            max_total_connection: None,
            default_max_total_connection_per_route: None,
            max_total_connection_per_route: HashMap::new(),
            discovery_enabled: false,
            discovery_frequency: DEFAULT_DISCOVERY_FREQUENCY,
            json_codec: None,
            conn_timeout: DEFAULT_TIMEOUT_MS,
            read_timeout: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn new(server: impl Into<String>) -> Self {
        Self::empty().add_server(server)
    }

    pub fn with_servers<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::empty().add_servers(servers)
    }

    /// Copy every setting of an existing configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            servers: config.servers.clone(),
            multi_threaded: config.multi_threaded,
            max_total_connection: config.max_total_connection,
            default_max_total_connection_per_route: config.default_max_total_connection_per_route,
            max_total_connection_per_route: config.max_total_connection_per_route.clone(),
            discovery_enabled: config.discovery_enabled,
            discovery_frequency: config.discovery_frequency,
            json_codec: config.json_codec.clone(),
            conn_timeout: config.conn_timeout,
            read_timeout: config.read_timeout,
        }
    }

    pub fn add_server(mut self, server: impl Into<String>) -> Self {
        self.servers.insert(server);
        self
    }

    pub fn add_servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers.extend(servers);
        self
    }

    pub fn json_codec(mut self, codec: Arc<dyn JsonCodec>) -> Self {
        self.json_codec = Some(codec);
        self
    }

    pub fn discovery_frequency(mut self, frequency: Duration) -> Self {
        self.discovery_frequency = frequency;
        self
    }

    pub fn discovery_enabled(mut self, enabled: bool) -> Self {
        self.discovery_enabled = enabled;
        self
    }

    pub fn multi_threaded(mut self, multi_threaded: bool) -> Self {
        self.multi_threaded = multi_threaded;
        self
    }

    /// Connect timeout in milliseconds
    pub fn conn_timeout(mut self, millis: u64) -> Self {
        self.conn_timeout = millis;
        self
    }

    /// Read timeout in milliseconds
    pub fn read_timeout(mut self, millis: u64) -> Self {
        self.read_timeout = millis;
        self
    }

    pub fn max_total_connection(mut self, max: usize) -> Self {
        self.max_total_connection = Some(max);
        self
    }

    pub fn default_max_total_connection_per_route(mut self, max: usize) -> Self {
        self.default_max_total_connection_per_route = Some(max);
        self
    }

    pub fn max_total_connection_per_route(mut self, route: HttpRoute, max: usize) -> Self {
        self.max_total_connection_per_route.insert(route, max);
        self
    }

    /// Merge several per-route limits at once
    pub fn max_total_connection_per_route_map(mut self, limits: HashMap<HttpRoute, usize>) -> Self {
        self.max_total_connection_per_route.extend(limits);
        self
    }

    pub fn build(self) -> ClientConfig {
        ClientConfig {
            servers: self.servers,
            multi_threaded: self.multi_threaded,
            max_total_connection: self.max_total_connection,
            default_max_total_connection_per_route: self.default_max_total_connection_per_route,
            max_total_connection_per_route: self.max_total_connection_per_route,
            discovery_enabled: self.discovery_enabled,
            discovery_frequency: self.discovery_frequency,
            json_codec: self.json_codec,
            conn_timeout: self.conn_timeout,
            read_timeout: self.read_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::codec::PrettyJsonCodec;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::builder("http://localhost:9200").build();
        assert_eq!(config.conn_timeout(), 3000);
        assert_eq!(config.read_timeout(), 3000);
        assert_eq!(config.discovery_frequency(), Duration::from_secs(10));
        assert!(!config.is_multi_threaded());
        assert!(!config.is_discovery_enabled());
        assert!(config.max_total_connection().is_none());
        assert!(config.default_max_total_connection_per_route().is_none());
        assert!(config.max_total_connection_per_route().is_empty());
        assert!(config.json_codec().is_none());
    }

    #[test]
    fn test_servers_are_ordered_and_unique() {
        let config = ClientConfigBuilder::with_servers(vec!["http://a:9200", "http://b:9200"])
            .add_server("http://a:9200")
            .add_servers(["http://c:9200"])
            .build();
        let servers: Vec<&String> = config.servers().iter().collect();
        assert_eq!(servers, vec!["http://a:9200", "http://b:9200", "http://c:9200"]);
    }

    #[test]
    fn test_setters_chain() {
        let route = HttpRoute::new("http", "localhost", 9200);
        let config = ClientConfig::builder("http://localhost:9200")
            .multi_threaded(true)
            .max_total_connection(20)
            .default_max_total_connection_per_route(10)
            .max_total_connection_per_route(route.clone(), 5)
            .discovery_enabled(true)
            .discovery_frequency(Duration::from_secs(30))
            .conn_timeout(150)
            .read_timeout(300)
            .json_codec(Arc::new(PrettyJsonCodec))
            .build();

        assert!(config.is_multi_threaded());
        assert_eq!(config.max_total_connection(), Some(20));
        assert_eq!(config.default_max_total_connection_per_route(), Some(10));
        assert_eq!(config.max_total_connection_per_route().get(&route), Some(&5));
        assert!(config.is_discovery_enabled());
        assert_eq!(config.discovery_frequency(), Duration::from_secs(30));
        assert_eq!(config.conn_timeout(), 150);
        assert_eq!(config.read_timeout(), 300);
        assert!(config.json_codec().is_some());
    }

    #[test]
    fn test_route_map_merges() {
        let one = HttpRoute::new("http", "one", 9200);
        let two = HttpRoute::new("http", "two", 9200);
        let config = ClientConfig::builder("http://one:9200")
            .max_total_connection_per_route(one.clone(), 1)
            .max_total_connection_per_route_map(HashMap::from([(two.clone(), 2)]))
            .build();
        assert_eq!(config.max_total_connection_per_route().len(), 2);
        assert_eq!(config.max_total_connection_per_route()[&two], 2);
    }

    #[test]
    fn test_from_config_copies_everything() {
        let original = ClientConfig::builder("http://a:9200")
            .multi_threaded(true)
            .conn_timeout(10)
            .discovery_enabled(true)
            .build();
        let copy = ClientConfigBuilder::from_config(&original)
            .add_server("http://b:9200")
            .build();

        assert!(copy.is_multi_threaded());
        assert!(copy.is_discovery_enabled());
        assert_eq!(copy.conn_timeout(), 10);
        assert_eq!(copy.servers().len(), 2);
        assert_eq!(original.servers().len(), 1);
    }

    #[test]
    fn test_empty_server_list_is_accepted() {
        let config = ClientConfigBuilder::with_servers(Vec::<String>::new()).build();
        assert!(config.servers().is_empty());
    }
}
