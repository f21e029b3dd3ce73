//! Per-request snapshot sent to the threat detector.
//!
//! # Responsibilities
//! - Capture everything the detector scores in one immutable record
//! - Serialize to the detector's wire format (field names are the contract)
//!
//! # Design Decisions
//! - Building never fails; a bad body degrades to an empty content list
//! - Duplicate header names keep the last value observed during iteration
//! - TLS fields are zero-valued on plaintext connections

use std::collections::HashMap;

use axum::http::header;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::content::{extract, KeyPath};
use crate::net::ConnMeta;

/// Request metadata submitted to the scoring service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub remote_ip: String,
    pub content: Vec<String>,
    pub headers: HashMap<String, String>,
    /// Unix timestamp (seconds) of connection establishment.
    pub connection_time: u64,
    pub connection_request_number: u64,
    pub is_tls: bool,
    pub user_agent: String,
    pub tls_version: u16,
    pub tls_handshake_complete: bool,
    pub tls_did_resume: bool,
    pub tls_cipher_suite: u16,
    pub tls_negotiated_protocol: String,
}

impl RequestSnapshot {
    /// Capture a snapshot from the pieces of one admitted request.
    pub fn capture(
        remote_ip: &str,
        parts: &Parts,
        conn: &ConnMeta,
        request_number: u64,
        body: &[u8],
        paths: &[KeyPath],
    ) -> Self {
        let mut headers = HashMap::new();
        for (name, value) in parts.headers.iter() {
            headers.insert(
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();

        let tls = conn.tls();

        Self {
            remote_ip: remote_ip.to_string(),
            content: extract(paths, body),
            headers,
            connection_time: conn.established_unix(),
            connection_request_number: request_number,
            is_tls: tls.is_some(),
            user_agent,
            tls_version: tls.map(|t| t.version).unwrap_or(0),
            tls_handshake_complete: tls.map(|t| t.handshake_complete).unwrap_or(false),
            tls_did_resume: tls.map(|t| t.did_resume).unwrap_or(false),
            tls_cipher_suite: tls.map(|t| t.cipher_suite).unwrap_or(0),
            tls_negotiated_protocol: tls
                .map(|t| t.negotiated_protocol.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    fn parts_with_headers(pairs: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("https://app.example.com/login");
        for (name, value) in pairs {
            builder = builder.header(*name, *value);
        }
        let (parts, _) = builder.body(Body::empty()).unwrap().into_parts();
        parts
    }

    fn plaintext_conn() -> ConnMeta {
        ConnMeta::plaintext()
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let parts = parts_with_headers(&[
            ("x-forwarded-for", "1.1.1.1"),
            ("x-forwarded-for", "2.2.2.2"),
            ("user-agent", "curl/8.0"),
        ]);
        let snapshot = RequestSnapshot::capture(
            "203.0.113.7",
            &parts,
            &plaintext_conn(),
            1,
            b"",
            &[],
        );

        assert_eq!(snapshot.headers.get("x-forwarded-for").unwrap(), "2.2.2.2");
        assert_eq!(snapshot.user_agent, "curl/8.0");
    }

    #[test]
    fn test_plaintext_zeroes_tls_fields() {
        let parts = parts_with_headers(&[]);
        let snapshot =
            RequestSnapshot::capture("203.0.113.7", &parts, &plaintext_conn(), 3, b"", &[]);

        assert!(!snapshot.is_tls);
        assert_eq!(snapshot.tls_version, 0);
        assert_eq!(snapshot.tls_cipher_suite, 0);
        assert!(!snapshot.tls_handshake_complete);
        assert!(!snapshot.tls_did_resume);
        assert!(snapshot.tls_negotiated_protocol.is_empty());
        assert_eq!(snapshot.connection_request_number, 3);
    }

    #[test]
    fn test_unparseable_body_degrades_to_empty_content() {
        let parts = parts_with_headers(&[]);
        let paths = vec![KeyPath::parse("user:email")];
        let snapshot = RequestSnapshot::capture(
            "203.0.113.7",
            &parts,
            &plaintext_conn(),
            1,
            b"{broken",
            &paths,
        );
        assert!(snapshot.content.is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let parts = parts_with_headers(&[]);
        let snapshot =
            RequestSnapshot::capture("203.0.113.7", &parts, &plaintext_conn(), 1, b"", &[]);
        let json = serde_json::to_value(&snapshot).unwrap();

        for field in [
            "remote_ip",
            "content",
            "headers",
            "connection_time",
            "connection_request_number",
            "is_tls",
            "user_agent",
            "tls_version",
            "tls_handshake_complete",
            "tls_did_resume",
            "tls_cipher_suite",
            "tls_negotiated_protocol",
        ] {
            assert!(json.get(field).is_some(), "missing wire field {field}");
        }
    }
}
