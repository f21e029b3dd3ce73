//! Shared threat-score cache.
//!
//! # Responsibilities
//! - Map client address → last known risk score
//! - Tolerate unbounded concurrent readers and writers
//!
//! # Design Decisions
//! - Unknown addresses read as 0.0, never as an error
//! - Writes are unconditional overwrites; the last completed write wins
//! - No expiry and no size bound; entries live for the process lifetime

use std::sync::Arc;

use dashmap::DashMap;

/// A thread-safe cache of per-client risk scores.
///
/// Cheap to clone; clones share the same underlying map. Created once at
/// startup and handed to the gate and the scorer by clone.
#[derive(Clone, Default)]
pub struct ThreatCache {
    inner: Arc<DashMap<String, f64>>,
}

impl ThreatCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Last known score for `addr`, or 0.0 if the address has never been scored.
    pub fn get(&self, addr: &str) -> f64 {
        self.inner.get(addr).map(|score| *score).unwrap_or(0.0)
    }

    /// Overwrite the score for `addr`.
    pub fn put(&self, addr: &str, score: f64) {
        self.inner.insert(addr.to_string(), score);
    }

    /// Number of scored addresses.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
