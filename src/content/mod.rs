//! Request-body content extraction subsystem.
//!
//! # Data Flow
//! ```text
//! Content-keys document (at startup):
//!     keys = ["user:profile:email", ...]
//!     → KeyPath::parse (split on ':')
//!     → Frozen as immutable Vec<KeyPath>
//!
//! Per request:
//!     raw body bytes
//!     → extractor.rs (parse as generic JSON, walk each path)
//!     → Vec<String> of resolved values, in configured order
//! ```
//!
//! # Design Decisions
//! - Paths compiled once at startup, immutable at runtime
//! - Malformed or empty bodies yield an empty result, never an error
//! - A path that fails to resolve contributes nothing (no placeholder)

pub mod extractor;

pub use extractor::{extract, KeyPath};
