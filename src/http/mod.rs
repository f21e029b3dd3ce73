//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection (net layer, ConnMeta attached)
//!     → server.rs (Axum setup, admission gate, scoring dispatch)
//!     → routing layer decides frontend vs backend
//!     → forward to upstream, relay response
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
