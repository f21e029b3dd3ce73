//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared with all subsystems at startup
//!
//! content-keys document (TOML)
//!     → loader.rs
//!     → Vec<KeyPath> (compiled once, immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any startup failure here is fatal: the proxy must not serve unconfigured

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_content_keys, ConfigError};
pub use schema::ListenerConfig;
pub use schema::ProxyConfig;
pub use schema::ScoringConfig;
pub use schema::UpstreamConfig;
