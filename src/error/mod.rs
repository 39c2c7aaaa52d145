//! Error handling module for the search client

use std::time::Duration;
use thiserror::Error;
use tokio::time::error::Elapsed;

/// Custom error type for the search client
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("HTTP request build error: {0}")]
    HttpBuild(#[from] hyper::http::Error),

    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] hyper::http::uri::InvalidUri),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No servers configured")]
    NoServers,

    #[error("Timed out after {0:?} waiting for a connection from the manager")]
    ConnectionRequestTimeout(Duration),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Timeout error: {0}")]
    Timeout(#[from] Elapsed),
}

/// Result type for the search client
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Unknown(err.to_string())
    }
}
