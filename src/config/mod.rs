//! Client configuration: the immutable [`ClientConfig`] and file/env settings

pub mod client_config;
pub mod settings;

pub use client_config::{ClientConfig, ClientConfigBuilder, DEFAULT_DISCOVERY_FREQUENCY, DEFAULT_TIMEOUT_MS};
pub use settings::{ClientSettings, LoggingConfig, RouteLimit};
