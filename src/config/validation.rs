//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (threshold finite, body limit nonzero)
//! - Check that URLs and addresses actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: field.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(err) => errors.push(ValidationError {
            field: field.to_string(),
            message: format!("not a valid URL: {}", err),
        }),
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("'{}' is not a socket address", config.listener.bind_address),
        });
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError {
            field: "listener.max_body_size".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    check_url(&mut errors, "upstreams.frontend_url", &config.upstreams.frontend_url);
    check_url(&mut errors, "upstreams.backend_url", &config.upstreams.backend_url);
    check_url(&mut errors, "scoring.detector_url", &config.scoring.detector_url);

    if config.upstreams.frontend_hostname.is_empty() {
        errors.push(ValidationError {
            field: "upstreams.frontend_hostname".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if !config.scoring.threshold.is_finite() || config.scoring.threshold < 0.0 {
        errors.push(ValidationError {
            field: "scoring.threshold".to_string(),
            message: "must be a finite, non-negative number".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
