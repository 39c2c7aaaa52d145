//! Clock and timeout helpers

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

/// Wall-clock time, used to stamp discovery runs
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// RFC 3339 with millisecond precision, e.g. `2024-05-01T10:00:00.250Z`
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Configured timeout in milliseconds; `0` disables the timeout.
pub fn timeout_from_millis(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}
