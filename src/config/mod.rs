//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared with the transports at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart.
//! - All fields have defaults so an empty file is a runnable config.
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every violation, not just the first.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{GatewayConfig, GrpcConfig, HttpConfig, TelemetryConfig};
