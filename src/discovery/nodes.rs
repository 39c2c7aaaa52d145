//! Extract server URIs from a node-info response

use crate::client::route::ServerList;
use serde_json::Value;

/// Server URIs of every node that reports an HTTP address.
///
/// Reads `nodes.<id>.http_address`, falling back to
/// `nodes.<id>.http.publish_address`. Nodes without either are skipped.
pub fn discovered_servers(nodes_info: &Value) -> ServerList {
    let Some(nodes) = nodes_info.get("nodes").and_then(Value::as_object) else {
        return ServerList::new();
    };

    nodes
        .values()
        .filter_map(node_http_address)
        .map(|address| format!("http://{}", address))
        .collect()
}

fn node_http_address(node: &Value) -> Option<String> {
    node.get("http_address")
        .and_then(Value::as_str)
        .or_else(|| {
            node.get("http")
                .and_then(|http| http.get("publish_address"))
                .and_then(Value::as_str)
        })
        .and_then(clean_address)
}

/// Strip the decorations nodes put around their address.
///
/// `inet[/10.0.0.1:9200]`, `inet[es-1/10.0.0.1:9200]`, `es-1/10.0.0.1:9200`
/// and `10.0.0.1:9200` all become `10.0.0.1:9200`.
pub fn clean_address(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix("inet[")
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(raw);
    let address = inner.rsplit('/').next()?;
    if address.is_empty() {
        None
    } else {
        Some(address.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_address_forms() {
        assert_eq!(clean_address("inet[/10.0.0.1:9200]").as_deref(), Some("10.0.0.1:9200"));
        assert_eq!(clean_address("inet[es-1/10.0.0.1:9200]").as_deref(), Some("10.0.0.1:9200"));
        assert_eq!(clean_address("es-1/10.0.0.1:9200").as_deref(), Some("10.0.0.1:9200"));
        assert_eq!(clean_address("10.0.0.1:9200").as_deref(), Some("10.0.0.1:9200"));
        assert_eq!(clean_address("inet[]"), None);
        assert_eq!(clean_address(""), None);
    }

    #[test]
    fn test_discovered_servers() {
        let response = json!({
            "cluster_name": "test",
            "nodes": {
                "a1": {"name": "one", "http_address": "inet[/10.0.0.1:9200]"},
                "b2": {"name": "two", "http": {"publish_address": "10.0.0.2:9200"}},
                "c3": {"name": "client-only"}
            }
        });

        let servers = discovered_servers(&response);
        assert_eq!(servers.len(), 2);
        assert!(servers.contains("http://10.0.0.1:9200"));
        assert!(servers.contains("http://10.0.0.2:9200"));
    }

    #[test]
    fn test_missing_nodes_yields_nothing() {
        assert!(discovered_servers(&json!({"error": "boom"})).is_empty());
        assert!(discovered_servers(&Value::Null).is_empty());
    }
}
