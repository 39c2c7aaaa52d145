//! Route keys and the ordered server set

use crate::error::Result;
use crate::utils::{default_port, parse_url};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target of a connection: scheme, host and port.
///
/// Per-route connection limits are keyed by this type. Two routes are equal
/// when all three components match, so `http://node1:9200` and
/// `https://node1:9200` are distinct routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpRoute {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl HttpRoute {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            host: host.into().to_ascii_lowercase(),
            port,
        }
    }

    /// Derive the route for a server or request URI.
    ///
    /// A missing port resolves to the scheme's default port.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let url = parse_url(uri)?;
        let scheme = url.scheme().to_string();
        let host = url
            .host_str()
            .ok_or_else(|| crate::Error::Config(format!("URI has no host: {}", uri)))?
            .to_string();
        let port = url.port().unwrap_or_else(|| default_port(&scheme));
        Ok(Self::new(scheme, host, port))
    }
}

impl fmt::Display for HttpRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Insertion-ordered set of server URIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerList {
    servers: Vec<String>,
}

impl ServerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a server, returning false when it was already present
    pub fn insert(&mut self, server: impl Into<String>) -> bool {
        let server = server.into();
        if self.servers.contains(&server) {
            return false;
        }
        self.servers.push(server);
        true
    }

    pub fn contains(&self, server: &str) -> bool {
        self.servers.iter().any(|s| s == server)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.servers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&String> {
        self.servers.get(index)
    }
}

impl<S: Into<String>> FromIterator<S> for ServerList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = ServerList::new();
        list.extend(iter);
        list
    }
}

impl<S: Into<String>> Extend<S> for ServerList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for server in iter {
            self.insert(server);
        }
    }
}

impl fmt::Display for ServerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.servers.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_uri_with_port() {
        let route = HttpRoute::from_uri("http://localhost:9200").unwrap();
        assert_eq!(route, HttpRoute::new("http", "localhost", 9200));
    }

    #[test]
    fn test_route_from_uri_default_port() {
        assert_eq!(HttpRoute::from_uri("https://es.example.com").unwrap().port, 443);
        assert_eq!(HttpRoute::from_uri("http://test.localhost/").unwrap().port, 80);
    }

    #[test]
    fn test_route_rejects_garbage() {
        assert!(HttpRoute::from_uri("not a uri").is_err());
    }

    #[test]
    fn test_server_list_keeps_order_and_uniqueness() {
        let mut list: ServerList = ["http://b:9200", "http://a:9200"].into_iter().collect();
        assert!(!list.insert("http://b:9200"));
        assert!(list.insert("http://c:9200"));

        let servers: Vec<&String> = list.iter().collect();
        assert_eq!(servers, vec!["http://b:9200", "http://a:9200", "http://c:9200"]);
        assert_eq!(list.to_string(), "[http://b:9200, http://a:9200, http://c:9200]");
    }
}
