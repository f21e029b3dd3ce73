//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host header)
//!     → selector.rs (exact comparison against the frontend hostname)
//!     → RouteDecision::Frontend | RouteDecision::Backend
//!     → http layer forwards to the matching upstream base URL
//! ```
//!
//! # Design Decisions
//! - Exactly two upstreams; anything that is not the frontend is the backend
//! - Byte-exact host comparison, decided fresh per request, never stored
//! - No suspension: the decision is pure string comparison

pub mod selector;

pub use selector::RouteDecision;
