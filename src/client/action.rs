//! Actions the client can execute and their results

use hyper::Method;
use serde::Serialize;
use serde_json::Value;

/// A request against the cluster, relative to whichever server the client picks
pub trait Action: Send + Sync {
    fn method(&self) -> Method;

    /// Path (and query) relative to the server root
    fn uri(&self) -> String;

    fn body(&self) -> Option<&Value> {
        None
    }

    fn name(&self) -> &'static str;
}

/// Decoded response of an executed action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonResult {
    pub status: u16,
    pub json: Value,
    pub succeeded: bool,
    pub error_message: Option<String>,
}

impl JsonResult {
    pub fn new(status: u16, json: Value) -> Self {
        let succeeded = (200..300).contains(&status);
        let error_message = if succeeded {
            None
        } else {
            Some(error_message(status, &json))
        };
        Self {
            status,
            json,
            succeeded,
            error_message,
        }
    }
}

fn error_message(status: u16, json: &Value) -> String {
    match json.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(error) => error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        None => format!("{} {}", status, json),
    }
}

/// Cluster node information restricted to HTTP addresses, used by discovery
#[derive(Debug, Default, Clone, Copy)]
pub struct NodesInfo;

impl Action for NodesInfo {
    fn method(&self) -> Method {
        Method::GET
    }

    fn uri(&self) -> String {
        "_nodes/_all/http".to_string()
    }

    fn name(&self) -> &'static str {
        "nodes_info"
    }
}

/// Arbitrary method, path and optional JSON body
#[derive(Debug, Clone)]
pub struct RawAction {
    method: Method,
    path: String,
    body: Option<Value>,
}

impl RawAction {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl Action for RawAction {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn uri(&self) -> String {
        self.path.clone()
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_result() {
        let result = JsonResult::new(200, json!({"acknowledged": true}));
        assert!(result.succeeded);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_error_reason_is_extracted() {
        let result = JsonResult::new(
            404,
            json!({"error": {"type": "index_not_found_exception", "reason": "no such index"}, "status": 404}),
        );
        assert!(!result.succeeded);
        assert_eq!(result.error_message.as_deref(), Some("no such index"));
    }

    #[test]
    fn test_plain_string_error() {
        let result = JsonResult::new(500, json!({"error": "IndexMissingException[[foo] missing]"}));
        assert_eq!(result.error_message.as_deref(), Some("IndexMissingException[[foo] missing]"));
    }

    #[test]
    fn test_raw_action() {
        let action = RawAction::new(Method::POST, "twitter/_search").with_body(json!({"size": 1}));
        assert_eq!(action.method(), Method::POST);
        assert_eq!(action.uri(), "twitter/_search");
        assert_eq!(action.body(), Some(&json!({"size": 1})));
    }
}
