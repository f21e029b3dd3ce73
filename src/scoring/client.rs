//! Threat detector client.
//!
//! # Responsibilities
//! - Serialize a request snapshot and POST it to the detector
//! - On success, overwrite the cached score for the client address
//! - On any failure, log and leave the cache untouched
//!
//! # Design Decisions
//! - Exactly one attempt per admitted request: no retries, no circuit
//!   breaker, no timeout beyond the transport defaults
//! - Success requires HTTP 200 and a decodable `{"threat": <number>}` body
//! - Errors never propagate to the request that triggered the call

use serde::Deserialize;
use thiserror::Error;

use crate::observability::metrics;
use crate::scoring::cache::ThreatCache;
use crate::scoring::snapshot::RequestSnapshot;

/// Sub-path appended to the configured detector base URL.
const THREAT_PATH: &str = "threat";

/// Client for the external risk-scoring service.
#[derive(Clone)]
pub struct ScorerClient {
    http: reqwest::Client,
    endpoint: String,
    cache: ThreatCache,
}

/// Why one scoring attempt failed.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("detector returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode detector response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ScoringError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::Transport(_) => "transport",
            ScoringError::Status(_) => "status",
            ScoringError::Decode(_) => "decode",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThreatResponse {
    threat: f64,
}

impl ScorerClient {
    /// Create a client posting to `{detector_url}/threat`.
    pub fn new(detector_url: &str, cache: ThreatCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/{}", detector_url.trim_end_matches('/'), THREAT_PATH),
            cache,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Score one snapshot and record the result.
    ///
    /// Runs detached from the request that produced the snapshot; the
    /// outcome is visible only through the cache, logs, and metrics.
    pub async fn score(&self, snapshot: RequestSnapshot) {
        let remote_ip = snapshot.remote_ip.clone();
        match self.submit(&snapshot).await {
            Ok(threat) => {
                tracing::info!(
                    remote_ip = %remote_ip,
                    threat,
                    "Updating client threat score"
                );
                self.cache.put(&remote_ip, threat);
                metrics::record_scoring("success");
            }
            Err(err) => {
                tracing::warn!(
                    remote_ip = %remote_ip,
                    error = %err,
                    "Threat scoring attempt failed"
                );
                metrics::record_scoring(err.kind());
            }
        }
    }

    async fn submit(&self, snapshot: &RequestSnapshot) -> Result<f64, ScoringError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(snapshot)
            .send()
            .await
            .map_err(ScoringError::Transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ScoringError::Status(status));
        }

        let decoded: ThreatResponse = response.json().await.map_err(ScoringError::Decode)?;
        Ok(decoded.threat)
    }
}
