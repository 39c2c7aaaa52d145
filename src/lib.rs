//! Searchbox Client - HTTP client assembly for search-engine clusters
//!
//! This library builds a ready-to-use cluster client from a configuration:
//! connection-manager selection and sizing, request timeouts, and optional
//! background node discovery that keeps the server list in sync with the
//! cluster's membership.
//!
//! ```no_run
//! use searchbox_client::{ClientConfig, ClientFactory, NodesInfo};
//!
//! # async fn run() -> searchbox_client::Result<()> {
//! let config = ClientConfig::builder("http://localhost:9200")
//!     .multi_threaded(true)
//!     .discovery_enabled(true)
//!     .build();
//! let client = ClientFactory::with_config(config).create().await?;
//! let nodes = client.execute(&NodesInfo).await?;
//! println!("{}", nodes.json);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod utils;

// Re-export commonly used items
pub use client::{
    Action, ClientFactory, ConnectionManager, HttpRoute, JsonCodec, JsonResult, NodesInfo, RawAction,
    RequestConfig, SearchClient, ServerList,
};
pub use config::{ClientConfig, ClientConfigBuilder, ClientSettings};
pub use discovery::{NodeCheckerHandle, NodeCheckerStats};
pub use error::{Error, Result};
pub use logging::{init_logger, init_logger_with_config, init_logger_with_env, init_logger_with_level};
