//! File and environment backed client settings

use crate::client::route::HttpRoute;
use crate::config::client_config::{ClientConfig, ClientConfigBuilder, DEFAULT_TIMEOUT_MS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file looked up by [`ClientSettings::load_config`]
pub const DEFAULT_CONFIG_PATH: &str = "searchbox.yml";

/// Client settings as written in `searchbox.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Server URIs, in the order they should be tried
    pub servers: Vec<String>,

    /// Use the pooling connection manager
    pub multi_threaded: bool,

    /// Global connection limit (pooling only)
    pub max_total_connection: Option<usize>,

    /// Default per-route connection limit (pooling only)
    pub default_max_total_connection_per_route: Option<usize>,

    /// Per-route connection limit overrides (pooling only)
    pub max_total_connection_per_route: Vec<RouteLimit>,

    /// Periodically refresh the server list from cluster membership
    pub discovery_enabled: bool,

    /// Seconds between discovery runs
    pub discovery_frequency_secs: u64,

    /// Connect timeout in milliseconds
    pub conn_timeout_ms: u64,

    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,

    /// Log level configuration
    pub log_level: String,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Connection limit for one route, keyed by any URI on that route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLimit {
    pub url: String,
    pub max: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to a daily rolling file (default: false)
    pub enable_file_logging: bool,

    /// Directory for log files
    pub log_dir: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            servers: vec!["http://localhost:9200".to_string()],
            multi_threaded: false,
            max_total_connection: None,
            default_max_total_connection_per_route: None,
            max_total_connection_per_route: Vec::new(),
            discovery_enabled: false,
            discovery_frequency_secs: 10,
            conn_timeout_ms: DEFAULT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_TIMEOUT_MS,
            log_level: "info".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_file_logging: false,
            log_dir: "logs".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl ClientSettings {
    /// Load settings from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Load `searchbox.yml` when present, otherwise defaults, then apply
    /// environment variable overrides
    pub fn load_config() -> Result<Self> {
        let mut settings = if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_yaml_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self::default()
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Defaults plus environment variable overrides
    pub fn from_env_vars() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(servers) = lookup("SEARCHBOX_SERVERS") {
            let servers: Vec<String> = servers
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !servers.is_empty() {
                self.servers = servers;
            }
        }

        if let Some(value) = lookup("SEARCHBOX_MULTI_THREADED") {
            self.multi_threaded = parse_flag(&value);
        }

        if let Some(value) = lookup("SEARCHBOX_MAX_TOTAL_CONNECTION") {
            if let Ok(max) = value.parse() {
                self.max_total_connection = Some(max);
            }
        }

        if let Some(value) = lookup("SEARCHBOX_DEFAULT_MAX_PER_ROUTE") {
            if let Ok(max) = value.parse() {
                self.default_max_total_connection_per_route = Some(max);
            }
        }

        if let Some(value) = lookup("SEARCHBOX_DISCOVERY_ENABLED") {
            self.discovery_enabled = parse_flag(&value);
        }

        if let Some(value) = lookup("SEARCHBOX_DISCOVERY_FREQUENCY_SECS") {
            if let Ok(secs) = value.parse() {
                self.discovery_frequency_secs = secs;
            }
        }

        if let Some(value) = lookup("SEARCHBOX_CONN_TIMEOUT_MS") {
            if let Ok(timeout) = value.parse() {
                self.conn_timeout_ms = timeout;
            }
        }

        if let Some(value) = lookup("SEARCHBOX_READ_TIMEOUT_MS") {
            if let Ok(timeout) = value.parse() {
                self.read_timeout_ms = timeout;
            }
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = level;
        }

        if let Some(value) = lookup("SEARCHBOX_ENABLE_FILE_LOGGING") {
            self.logging.enable_file_logging = parse_flag(&value);
        }

        if let Some(dir) = lookup("SEARCHBOX_LOG_DIR") {
            self.logging.log_dir = dir;
        }
    }

    /// Build the immutable client configuration
    pub fn to_client_config(&self) -> crate::Result<ClientConfig> {
        let mut builder = ClientConfigBuilder::with_servers(self.servers.iter().cloned())
            .multi_threaded(self.multi_threaded)
            .discovery_enabled(self.discovery_enabled)
            .discovery_frequency(Duration::from_secs(self.discovery_frequency_secs))
            .conn_timeout(self.conn_timeout_ms)
            .read_timeout(self.read_timeout_ms);

        if let Some(max) = self.max_total_connection {
            builder = builder.max_total_connection(max);
        }

        if let Some(max) = self.default_max_total_connection_per_route {
            builder = builder.default_max_total_connection_per_route(max);
        }

        for limit in &self.max_total_connection_per_route {
            builder = builder.max_total_connection_per_route(HttpRoute::from_uri(&limit.url)?, limit.max);
        }

        Ok(builder.build())
    }
}
