//! Stub cluster node for integration tests

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Running stub node
pub struct StubNode {
    pub addr: SocketAddr,
    nodes_info_hits: Arc<AtomicUsize>,
}

impl StubNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn nodes_info_hits(&self) -> usize {
        self.nodes_info_hits.load(Ordering::SeqCst)
    }
}

async fn handle(
    req: Request<Body>,
    nodes_info: Arc<(StatusCode, Value)>,
    hits: Arc<AtomicUsize>,
    delay: Duration,
) -> Result<Response<Body>, Infallible> {
    tokio::time::sleep(delay).await;

    let path = req.uri().path().to_string();
    let method = req.method().to_string();

    let (status, body) = if path == "/_nodes/_all/http" {
        hits.fetch_add(1, Ordering::SeqCst);
        nodes_info.as_ref().clone()
    } else if path.starts_with("/missing") {
        (
            StatusCode::NOT_FOUND,
            json!({"error": {"type": "index_not_found_exception", "reason": "no such index"}, "status": 404}),
        )
    } else {
        let bytes = hyper::body::to_bytes(req.into_body()).await.unwrap_or_default();
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (StatusCode::OK, json!({"path": path, "method": method, "body": body}))
    };

    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap())
}

/// Start a stub node. `nodes_info` receives the node's own address and
/// returns what `_nodes/_all/http` should answer.
pub fn spawn_node<F>(nodes_info: F, delay: Duration) -> StubNode
where
    F: FnOnce(SocketAddr) -> Value,
{
    spawn_node_with_status(StatusCode::OK, nodes_info, delay)
}

/// Like [`spawn_node`], with `_nodes/_all/http` answering `status`
pub fn spawn_node_with_status<F>(status: StatusCode, nodes_info: F, delay: Duration) -> StubNode
where
    F: FnOnce(SocketAddr) -> Value,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let nodes_info = Arc::new((status, nodes_info(addr)));
    let hits = Arc::new(AtomicUsize::new(0));
    let service_hits = Arc::clone(&hits);

    let make_svc = make_service_fn(move |_conn| {
        let nodes_info = Arc::clone(&nodes_info);
        let hits = Arc::clone(&service_hits);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                handle(req, Arc::clone(&nodes_info), Arc::clone(&hits), delay)
            }))
        }
    });

    let server = Server::from_tcp(listener).unwrap().serve(make_svc);
    tokio::spawn(server);

    StubNode {
        addr,
        nodes_info_hits: hits,
    }
}

/// Node-info answer listing the given addresses in the `inet[/…]` form
pub fn nodes_info_for(addrs: &[String]) -> Value {
    let nodes: serde_json::Map<String, Value> = addrs
        .iter()
        .enumerate()
        .map(|(i, addr)| {
            (
                format!("node-{}", i),
                json!({"name": format!("node-{}", i), "http_address": format!("inet[/{}]", addr)}),
            )
        })
        .collect();
    json!({"cluster_name": "stub", "nodes": nodes})
}
