//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (certificate/key loading at startup)
//!     → acceptor.rs (optional TLS handshake, ConnMeta capture)
//!     → Hand off to HTTP layer with ConnMeta in request extensions
//! ```
//!
//! # Design Decisions
//! - Connection facts are captured once, at accept time, not per request
//! - TLS introspection happens directly on the rustls session
//! - The same metadata shape is injected for plaintext connections, with the
//!   TLS portion absent

pub mod acceptor;
pub mod tls;

pub use acceptor::{ConnMeta, PlainMetaAcceptor, TlsMeta, TlsMetaAcceptor};
