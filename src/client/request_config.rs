//! Per-request timeout settings

use crate::utils::timeout_from_millis;
use std::time::Duration;

/// Default timeouts applied to every request a client sends.
///
/// `connect_timeout` is applied twice: it bounds the wait for a connection
/// slot from the connection manager, and it is also set as the TCP connect
/// timeout of the underlying HTTP connector. `read_timeout` bounds the wait
/// for the complete response. `None` means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestConfig {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

impl RequestConfig {
    /// No timeouts, used when a client is created without configuration
    pub const DEFAULT: RequestConfig = RequestConfig {
        connect_timeout: None,
        read_timeout: None,
    };

    /// Timeouts from configured milliseconds. `0` means no limit.
    pub fn from_millis(connect_timeout_ms: u64, read_timeout_ms: u64) -> Self {
        Self {
            connect_timeout: timeout_from_millis(connect_timeout_ms),
            read_timeout: timeout_from_millis(read_timeout_ms),
        }
    }
}
