//! Connection managers
//!
//! A connection manager decides how many requests may be in flight at once,
//! globally and per route. Every request leases a slot before it is sent and
//! gives it back when the lease is dropped. The socket-level pooling itself is
//! left to hyper; the manager also tells hyper how many idle connections to
//! keep per host so both layers agree on sizing.
//!
//! - [`BasicConnectionManager`] allows a single connection at a time.
//! - [`PoolingConnectionManager`] enforces a global limit plus a per-route
//!   limit, with optional overrides for individual routes.

use crate::client::route::HttpRoute;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

/// Default global connection limit of the pooling manager
pub const DEFAULT_MAX_TOTAL: usize = 20;

/// Default per-route connection limit of the pooling manager
pub const DEFAULT_MAX_PER_ROUTE: usize = 2;

/// A leased connection slot. The slot is released on drop.
#[derive(Debug)]
pub struct ConnectionLease {
    route: HttpRoute,
    _total: OwnedSemaphorePermit,
    _route: Option<OwnedSemaphorePermit>,
}

impl ConnectionLease {
    pub fn route(&self) -> &HttpRoute {
        &self.route
    }
}

/// Run an acquisition future, bounded by the connection request timeout if one is set
async fn acquire_within<F, T>(timeout: Option<Duration>, acquire: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, acquire)
            .await
            .map_err(|_| Error::ConnectionRequestTimeout(limit))?,
        None => acquire.await,
    }
}

/// Largest limit a semaphore can represent; larger limits are capped to it
fn capped(limit: usize) -> usize {
    if limit > Semaphore::MAX_PERMITS {
        debug!("Connection limit {} capped to {}", limit, Semaphore::MAX_PERMITS);
    }
    limit.min(Semaphore::MAX_PERMITS)
}

fn closed(_: tokio::sync::AcquireError) -> Error {
    Error::Unknown("connection manager has been shut down".to_string())
}

/// Manager that hands out a single connection at a time
#[derive(Debug)]
pub struct BasicConnectionManager {
    connection: Arc<Semaphore>,
}

impl Default for BasicConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicConnectionManager {
    pub fn new() -> Self {
        Self {
            connection: Arc::new(Semaphore::new(1)),
        }
    }

    /// Lease the single connection, waiting up to `timeout` for it to come back
    pub async fn lease(&self, route: &HttpRoute, timeout: Option<Duration>) -> Result<ConnectionLease> {
        let connection = Arc::clone(&self.connection);
        let permit = acquire_within(timeout, async move { connection.acquire_owned().await.map_err(closed) }).await?;
        Ok(ConnectionLease {
            route: route.clone(),
            _total: permit,
            _route: None,
        })
    }

    /// Whether the connection is currently leased
    pub fn is_leased(&self) -> bool {
        self.connection.available_permits() == 0
    }
}

/// Snapshot of the pooling manager's global counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub max: usize,
    pub leased: usize,
    pub available: usize,
}

/// Manager with a global connection limit and per-route limits
#[derive(Debug)]
pub struct PoolingConnectionManager {
    max_total: usize,
    default_max_per_route: usize,
    max_per_route: HashMap<HttpRoute, usize>,
    total: Arc<Semaphore>,
    routes: Mutex<HashMap<HttpRoute, Arc<Semaphore>>>,
}

impl Default for PoolingConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolingConnectionManager {
    pub fn new() -> Self {
        Self {
            max_total: DEFAULT_MAX_TOTAL,
            default_max_per_route: DEFAULT_MAX_PER_ROUTE,
            max_per_route: HashMap::new(),
            total: Arc::new(Semaphore::new(DEFAULT_MAX_TOTAL)),
            routes: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_max_total(&mut self, max_total: usize) {
        self.max_total = capped(max_total);
        self.total = Arc::new(Semaphore::new(self.max_total));
    }

    pub fn set_default_max_per_route(&mut self, max: usize) {
        self.default_max_per_route = capped(max);
        // Semaphores are created lazily; drop the ones sized with the old default.
        self.routes.get_mut().clear();
    }

    pub fn set_max_per_route(&mut self, route: HttpRoute, max: usize) {
        self.routes.get_mut().remove(&route);
        self.max_per_route.insert(route, capped(max));
    }

    pub fn max_total(&self) -> usize {
        self.max_total
    }

    pub fn default_max_per_route(&self) -> usize {
        self.default_max_per_route
    }

    /// Limit for a route: its override if one was set, otherwise the default
    pub fn max_per_route(&self, route: &HttpRoute) -> usize {
        self.max_per_route
            .get(route)
            .copied()
            .unwrap_or(self.default_max_per_route)
    }

    /// Routes that carry an explicit limit
    pub fn routes(&self) -> impl Iterator<Item = (&HttpRoute, &usize)> {
        self.max_per_route.iter()
    }

    pub fn total_stats(&self) -> PoolStats {
        let available = self.total.available_permits();
        PoolStats {
            max: self.max_total,
            leased: self.max_total.saturating_sub(available),
            available,
        }
    }

    /// Idle connections hyper should keep per host
    pub fn max_idle_per_host(&self) -> usize {
        let largest_route = self
            .max_per_route
            .values()
            .copied()
            .fold(self.default_max_per_route, usize::max);
        largest_route.min(self.max_total).max(1)
    }

    fn route_slots(&self, route: &HttpRoute) -> Arc<Semaphore> {
        let mut routes = self.routes.lock();
        let limit = self.max_per_route(route);
        Arc::clone(
            routes
                .entry(route.clone())
                .or_insert_with(|| Arc::new(Semaphore::new(limit))),
        )
    }

    /// Lease a slot for `route`, waiting up to `timeout` for both the route
    /// limit and the global limit.
    pub async fn lease(&self, route: &HttpRoute, timeout: Option<Duration>) -> Result<ConnectionLease> {
        let route_slots = self.route_slots(route);
        let total = Arc::clone(&self.total);

        // Route first, so a request queued on a busy route does not hold a global slot.
        let (route_permit, total_permit) = acquire_within(timeout, async move {
            let route_permit = route_slots.acquire_owned().await.map_err(closed)?;
            let total_permit = total.acquire_owned().await.map_err(closed)?;
            Ok::<_, Error>((route_permit, total_permit))
        })
        .await?;

        Ok(ConnectionLease {
            route: route.clone(),
            _total: total_permit,
            _route: Some(route_permit),
        })
    }
}

/// The connection manager attached to a client
#[derive(Debug)]
pub enum ConnectionManager {
    Basic(BasicConnectionManager),
    Pooling(PoolingConnectionManager),
}

impl ConnectionManager {
    pub async fn lease(&self, route: &HttpRoute, timeout: Option<Duration>) -> Result<ConnectionLease> {
        let lease = match self {
            ConnectionManager::Basic(manager) => manager.lease(route, timeout).await?,
            ConnectionManager::Pooling(manager) => manager.lease(route, timeout).await?,
        };
        debug!("📡 Leased connection for {}", route);
        Ok(lease)
    }

    pub fn is_pooling(&self) -> bool {
        matches!(self, ConnectionManager::Pooling(_))
    }

    pub fn as_pooling(&self) -> Option<&PoolingConnectionManager> {
        match self {
            ConnectionManager::Pooling(manager) => Some(manager),
            ConnectionManager::Basic(_) => None,
        }
    }

    pub fn max_idle_per_host(&self) -> usize {
        match self {
            ConnectionManager::Basic(_) => 1,
            ConnectionManager::Pooling(manager) => manager.max_idle_per_host(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConnectionManager::Basic(_) => "basic",
            ConnectionManager::Pooling(_) => "pooling",
        }
    }

    /// Log the manager's sizing for monitoring
    pub fn log_connection_stats(&self) {
        match self {
            ConnectionManager::Basic(_) => {
                info!("📊 Connection manager: basic (single connection)");
            }
            ConnectionManager::Pooling(manager) => {
                let stats = manager.total_stats();
                info!("📊 Connection manager: pooling");
                info!("   Max total: {}", stats.max);
                info!("   Default max per route: {}", manager.default_max_per_route());
                for (route, max) in manager.routes() {
                    info!("   Max for {}: {}", route, max);
                }
                info!("   Leased: {} / available: {}", stats.leased, stats.available);
            }
        }
    }
}
