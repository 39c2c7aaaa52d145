//! Search cluster client
//!
//! [`SearchClient`] is the handle produced by [`ClientFactory`]. It owns the
//! active server list, the connection manager, the default request timeouts and
//! the underlying hyper client, and it executes [`Action`]s against the next
//! server in round-robin order.
//!
//! The server list may be replaced at any time by the discovery task. It sits
//! behind a lock and is swapped as a whole, so a request always picks from
//! either the old or the new list, never a mix.

pub mod action;
pub mod codec;
pub mod connection;
pub mod factory;
pub mod request_config;
pub mod route;

pub use action::{Action, JsonResult, NodesInfo, RawAction};
pub use codec::{DefaultJsonCodec, JsonCodec, PrettyJsonCodec};
pub use connection::{BasicConnectionManager, ConnectionLease, ConnectionManager, PoolStats, PoolingConnectionManager};
pub use factory::{ClientFactory, DEFAULT_SERVER};
pub use request_config::RequestConfig;
pub use route::{HttpRoute, ServerList};

use crate::discovery::NodeCheckerHandle;
use crate::error::{Error, Result};
use crate::utils::join_server_path;
use bytes::Bytes;
use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Body, Client, Request};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

type HttpsClient = Client<HttpsConnector<HttpConnector>, Body>;

/// How long hyper keeps an idle pooled socket around
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

pub(crate) struct ClientInner {
    servers: RwLock<ServerList>,
    next_server: AtomicUsize,
    connection_manager: ConnectionManager,
    request_config: RequestConfig,
    json_codec: Arc<dyn JsonCodec>,
    http: HttpsClient,
    node_checker: OnceLock<NodeCheckerHandle>,
}

/// Handle for talking to a search cluster. Cloning is cheap and clones share
/// the same servers, connection manager and discovery task.
#[derive(Clone)]
pub struct SearchClient {
    inner: Arc<ClientInner>,
}

fn build_http_client(connection_manager: &ConnectionManager, request_config: &RequestConfig) -> HttpsClient {
    let mut http_connector = HttpConnector::new();
    http_connector.enforce_http(false);
    // The connect timeout also bounds the lease wait in the connection manager.
    http_connector.set_connect_timeout(request_config.connect_timeout);
    http_connector.set_nodelay(true);

    let https_connector = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http_connector);

    Client::builder()
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(connection_manager.max_idle_per_host())
        .build(https_connector)
}

impl SearchClient {
    pub(crate) fn new(
        servers: ServerList,
        connection_manager: ConnectionManager,
        request_config: RequestConfig,
        json_codec: Arc<dyn JsonCodec>,
    ) -> Self {
        let http = build_http_client(&connection_manager, &request_config);

        info!("🚀 Search client created");
        info!("   Servers: {}", servers);
        info!("   Connection manager: {}", connection_manager.name());
        info!("   Connect timeout: {:?}", request_config.connect_timeout);
        info!("   Read timeout: {:?}", request_config.read_timeout);

        Self {
            inner: Arc::new(ClientInner {
                servers: RwLock::new(servers),
                next_server: AtomicUsize::new(0),
                connection_manager,
                request_config,
                json_codec,
                http,
                node_checker: OnceLock::new(),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ClientInner> {
        Arc::downgrade(&self.inner)
    }

    /// Snapshot of the current server list
    pub fn servers(&self) -> ServerList {
        self.inner.servers.read().clone()
    }

    /// Replace the server list
    pub fn set_servers(&self, servers: ServerList) {
        let mut current = self.inner.servers.write();
        if *current != servers {
            debug!("🔄 Server list changed from {} to {}", current, servers);
        }
        *current = servers;
    }

    /// Next server in round-robin order
    pub fn next_server(&self) -> Result<String> {
        let servers = self.inner.servers.read();
        if servers.is_empty() {
            return Err(Error::NoServers);
        }
        let index = self.inner.next_server.fetch_add(1, Ordering::Relaxed) % servers.len();
        servers.get(index).cloned().ok_or(Error::NoServers)
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.inner.connection_manager
    }

    pub fn default_request_config(&self) -> &RequestConfig {
        &self.inner.request_config
    }

    pub fn json_codec(&self) -> &Arc<dyn JsonCodec> {
        &self.inner.json_codec
    }

    /// Discovery task handle, present when the client was created with discovery enabled
    pub fn node_checker(&self) -> Option<&NodeCheckerHandle> {
        self.inner.node_checker.get()
    }

    pub(crate) fn set_node_checker(&self, handle: NodeCheckerHandle) {
        if self.inner.node_checker.set(handle).is_err() {
            debug!("Node checker already attached, keeping the existing one");
        }
    }

    /// Execute an action against the next server
    pub async fn execute<A: Action + ?Sized>(&self, action: &A) -> Result<JsonResult> {
        let server = self.next_server()?;
        let url = join_server_path(&server, &action.uri());
        let route = HttpRoute::from_uri(&url)?;
        let request_config = self.inner.request_config;

        let _lease = self
            .inner
            .connection_manager
            .lease(&route, request_config.connect_timeout)
            .await?;

        let body = match action.body() {
            Some(json) => Body::from(Bytes::from(self.inner.json_codec.to_vec(json)?)),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(action.method())
            .uri(url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)?;

        debug!("📤 {} {} ({})", action.method(), url, action.name());

        let send = async {
            let response = self.inner.http.request(request).await?;
            let status = response.status().as_u16();
            let bytes = hyper::body::to_bytes(response.into_body()).await?;
            Ok::<_, Error>((status, bytes))
        };

        let (status, bytes) = match request_config.read_timeout {
            Some(limit) => tokio::time::timeout(limit, send).await??,
            None => send.await?,
        };

        debug!("📥 {} from {} ({} bytes)", status, url, bytes.len());

        let json = self.inner.json_codec.from_slice(&bytes)?;
        Ok(JsonResult::new(status, json))
    }

    /// Execute an action on a spawned task
    pub fn spawn_execute<A>(&self, action: A) -> JoinHandle<Result<JsonResult>>
    where
        A: Action + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move { client.execute(&action).await })
    }

    /// Stop the discovery task, if any, and wait for it to finish
    pub async fn shutdown(&self) {
        if let Some(node_checker) = self.node_checker() {
            node_checker.stop().await;
        }
        info!("🛑 Search client shut down");
    }
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("servers", &*self.inner.servers.read())
            .field("connection_manager", &self.inner.connection_manager.name())
            .field("request_config", &self.inner.request_config)
            .field("discovery", &self.inner.node_checker.get().is_some())
            .finish()
    }
}
