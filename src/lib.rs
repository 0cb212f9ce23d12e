//! Multi-protocol hotel reservation gateway library.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod lifecycle;
pub mod store;
pub mod telemetry;

pub use adapters::GatewayState;
pub use config::GatewayConfig;
pub use lifecycle::Shutdown;
