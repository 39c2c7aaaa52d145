//! Background node discovery
//!
//! The node checker asks the cluster for its members on a fixed interval and
//! replaces the client's server list with the HTTP addresses it finds. A failed
//! or empty run leaves the current list alone; the next tick simply tries
//! again.
//!
//! The checker only holds a weak reference to its client. Dropping every
//! client handle ends the task, as does [`NodeCheckerHandle::stop`].

pub mod nodes;

pub use nodes::{clean_address, discovered_servers};

use crate::client::{ClientInner, NodesInfo, SearchClient};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::utils::{duration_to_ms, format_timestamp, now};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Counters describing what the node checker has done so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeCheckerStats {
    pub iterations: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Servers found by the last successful run
    pub last_discovered: usize,
}

/// Periodic cluster-membership poller bound to one client
pub struct NodeChecker {
    client: Weak<ClientInner>,
    interval: Duration,
    stats: Arc<RwLock<NodeCheckerStats>>,
}

enum Iteration {
    Completed,
    ClientGone,
}

impl NodeChecker {
    /// Bind a checker to `client`, polling at the configured discovery frequency.
    ///
    /// A zero frequency is rejected.
    pub fn new(config: &ClientConfig, client: &SearchClient) -> Result<Self> {
        let interval = config.discovery_frequency();
        if interval.is_zero() {
            return Err(Error::Config("discovery frequency must be greater than zero".to_string()));
        }

        Ok(Self {
            client: client.downgrade(),
            interval,
            stats: Arc::new(RwLock::new(NodeCheckerStats::default())),
        })
    }

    /// Run the first discovery pass, then keep polling on a background task
    pub async fn start_and_wait(self) -> NodeCheckerHandle {
        info!("🔍 Starting node checker (every {}ms)", duration_to_ms(self.interval));

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let stats = Arc::clone(&self.stats);
        let interval = self.interval;

        let task = match self.run_one_iteration().await {
            Iteration::Completed => tokio::spawn(self.run(shutdown_rx)),
            Iteration::ClientGone => tokio::spawn(async {}),
        };

        NodeCheckerHandle {
            inner: Arc::new(HandleInner {
                interval,
                stats,
                shutdown: Mutex::new(Some(shutdown_tx)),
                task: Mutex::new(Some(task)),
            }),
        }
    }

    async fn run(self, mut shutdown: mpsc::Receiver<()>) {
        // The first pass already ran in start_and_wait.
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Iteration::ClientGone = self.run_one_iteration().await {
                        debug!("Client dropped, node checker exiting");
                        break;
                    }
                }
                _ = shutdown.recv() => {
                    info!("🛑 Node checker shutting down");
                    break;
                }
            }
        }
    }

    async fn run_one_iteration(&self) -> Iteration {
        let Some(inner) = self.client.upgrade() else {
            return Iteration::ClientGone;
        };
        let client = SearchClient::from_inner(inner);

        let outcome = Self::refresh(&client).await;

        let mut stats = self.stats.write();
        stats.iterations += 1;
        stats.last_run = Some(now());
        match outcome {
            Ok(discovered) => {
                stats.last_error = None;
                if discovered > 0 {
                    stats.last_discovered = discovered;
                }
            }
            Err(e) => {
                error!("❌ Error executing NodesInfo: {}", e);
                stats.last_error = Some(e.to_string());
            }
        }

        Iteration::Completed
    }

    /// One discovery pass; returns how many servers were found
    async fn refresh(client: &SearchClient) -> Result<usize> {
        let result = client.execute(&NodesInfo).await?;

        if !result.succeeded {
            return Err(Error::Discovery(format!(
                "NodesInfo request resulted in error: {}",
                result.error_message.unwrap_or_default()
            )));
        }

        let servers = discovered_servers(&result.json);
        if servers.is_empty() {
            warn!("⚠️  NodesInfo returned no HTTP addresses, keeping {}", client.servers());
            return Ok(0);
        }

        info!("🔍 Discovered Http Hosts: {}", servers);
        let count = servers.len();
        client.set_servers(servers);
        Ok(count)
    }
}

#[derive(Debug)]
struct HandleInner {
    interval: Duration,
    stats: Arc<RwLock<NodeCheckerStats>>,
    shutdown: Mutex<Option<mpsc::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Observe and stop a running node checker
#[derive(Debug, Clone)]
pub struct NodeCheckerHandle {
    inner: Arc<HandleInner>,
}

impl NodeCheckerHandle {
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    pub fn stats(&self) -> NodeCheckerStats {
        self.inner.stats.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .task
            .lock()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Stop polling and wait for the task to end. Calling it again is a no-op.
    pub async fn stop(&self) {
        // Dropping the sender wakes the task's shutdown branch.
        let sender = self.inner.shutdown.lock().take();
        drop(sender);

        let task = self.inner.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Node checker task ended abnormally: {}", e);
            }
        }

        let stats = self.stats();
        debug!(
            "Node checker stopped after {} iterations (last run: {})",
            stats.iterations,
            stats.last_run.map(format_timestamp).unwrap_or_else(|| "never".to_string())
        );
    }
}
