//! Threat-gated edge reverse proxy.
//!
//! Routes inbound traffic to one of two upstreams by Host header while
//! scoring every admitted request out-of-band against an external threat
//! detector. The last score returned for a client address gates that
//! client's future requests.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                   THREATGATE                     │
//!                 │                                                  │
//!  Client ───────▶│  net (TLS accept, ConnMeta) ─▶ http (dispatch)   │
//!                 │        │                          │              │
//!                 │        │                 gate ◀── scoring cache  │
//!                 │        │                  │            ▲         │
//!                 │        │          allowed │            │ put     │
//!                 │        ▼                  ▼            │         │
//!                 │  snapshot capture ──▶ scoring client ──┘         │
//!                 │   (detached task)     POST {detector}/threat     │
//!                 │                                                  │
//!                 │  routing (Host header) ─▶ frontend | backend     │
//!                 └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;

// Traffic gating
pub mod content;
pub mod gate;
pub mod scoring;

// Cross-cutting concerns
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use scoring::ThreatCache;
