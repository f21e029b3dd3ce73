//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the threat-gated proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS, limits).
    pub listener: ListenerConfig,

    /// The two upstream services and the frontend hostname.
    pub upstreams: UpstreamConfig,

    /// Threat detector endpoint and admission threshold.
    pub scoring: ScoringConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Optional TLS configuration. Absent means a plaintext listener.
    pub tls: Option<TlsConfig>,

    /// Maximum buffered request body size in bytes.
    pub max_body_size: usize,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            tls: None,
            max_body_size: 2 * 1024 * 1024, // 2MB
            request_timeout_secs: 30,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the frontend upstream.
    pub frontend_url: String,

    /// Base URL of the backend upstream.
    pub backend_url: String,

    /// Host header value that selects the frontend (exact match).
    pub frontend_hostname: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            frontend_url: "http://127.0.0.1:3000".to_string(),
            backend_url: "http://127.0.0.1:3001".to_string(),
            frontend_hostname: "localhost".to_string(),
        }
    }
}

/// Threat scoring configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base URL of the threat detector service.
    pub detector_url: String,

    /// Cached scores strictly above this value are denied.
    pub threshold: f64,

    /// Path to the content-keys document (TOML, `keys = ["a:b:c", ...]`).
    pub content_keys_path: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            detector_url: "http://127.0.0.1:9000".to_string(),
            threshold: 0.7,
            content_keys_path: "content-keys.toml".to_string(),
        }
    }
}

/// Ordered content-extraction key paths, loaded from their own document.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContentKeys {
    pub keys: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
