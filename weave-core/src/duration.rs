//! A stable-wire-format duration newtype, used for timeouts and metrics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Milliseconds, serialized as a plain integer rather than serde's default
/// `{secs, nanos}` shape for `std::time::Duration`. Keeping the wire format
/// a single integer makes it trivial to read/write from TOML config and to
/// compare across languages at the boundary this crate is an adapter for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMs(pub u64);

impl DurationMs {
    /// Zero duration.
    pub const ZERO: DurationMs = DurationMs(0);

    /// Construct from milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        DurationMs(ms)
    }

    /// Construct from whole seconds.
    pub fn from_secs(secs: u64) -> Self {
        DurationMs(secs * 1000)
    }

    /// Milliseconds as a plain integer.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Convert to `std::time::Duration`.
    pub fn to_std(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Duration> for DurationMs {
    fn from(d: Duration) -> Self {
        DurationMs(d.as_millis() as u64)
    }
}

impl From<DurationMs> for Duration {
    fn from(d: DurationMs) -> Self {
        d.to_std()
    }
}

impl Default for DurationMs {
    fn default() -> Self {
        DurationMs::ZERO
    }
}

impl std::fmt::Display for DurationMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
