//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --config path or search paths
//!     → loader.rs (discover, read & deserialize)
//!     → validation.rs (semantic checks)
//!     → SentryConfig (validated, immutable)
//!     → cli overrides applied by the binary
//!     → [defaults] / [[targets]] handed to crate::target for resolution
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{find_config, load_config, search_paths, ConfigError};
pub use schema::{HttpConfig, ObservabilityConfig, SentryConfig, SmtpConfig};
