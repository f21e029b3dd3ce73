//! Risk-scoring subsystem.
//!
//! # Data Flow
//! ```text
//! Admitted request
//!     → snapshot.rs (capture network, TLS, header, content data)
//!     → client.rs (POST to the detector, detached from the request)
//!     → cache.rs (overwrite score for the client address on success)
//!
//! Admission path (per request, before forwarding):
//!     gate reads cache.rs → allow/deny
//! ```
//!
//! # Design Decisions
//! - Scoring is fire-and-forget: it never blocks admission or forwarding,
//!   and it keeps running if the client disconnects
//! - Concurrent scorings for one address race; completion order wins
//! - The cache is the only state shared across requests

pub mod cache;
pub mod client;
pub mod snapshot;

pub use cache::ThreatCache;
pub use client::ScorerClient;
pub use snapshot::RequestSnapshot;
