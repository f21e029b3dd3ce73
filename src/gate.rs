//! Admission gate.
//!
//! # Responsibilities
//! - Decide allow/deny for a request before any forwarding work happens
//! - Compare the cached risk score against the configured threshold
//!
//! # Design Decisions
//! - Read-only: the gate never mutates the cache
//! - Fail closed on an unresolved client address
//! - A denial short-circuits everything downstream, including the scoring
//!   dispatch, so a denied address keeps its last score until restart

use crate::scoring::cache::ThreatCache;

/// Outcome of the admission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DenyReason),
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The client address could not be determined.
    UnresolvedClient,
    /// The cached score for the address exceeds the threshold.
    ScoreExceeded,
}

impl DenyReason {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::UnresolvedClient => "unresolved_client",
            DenyReason::ScoreExceeded => "score_exceeded",
        }
    }
}

/// Decide whether a request from `client_ip` may proceed.
///
/// Denies when the address is empty or when its cached score is strictly
/// greater than `threshold`. Addresses without a cache entry read as 0.0 and
/// are admitted for any non-negative threshold.
pub fn evaluate(client_ip: &str, cache: &ThreatCache, threshold: f64) -> Verdict {
    if client_ip.is_empty() {
        return Verdict::Deny(DenyReason::UnresolvedClient);
    }

    let score = cache.get(client_ip);
    if score > threshold {
        return Verdict::Deny(DenyReason::ScoreExceeded);
    }

    Verdict::Allow
}
