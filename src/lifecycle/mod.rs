//! Lifecycle management.
//!
//! Startup order is config → store/services/telemetry → listeners; shutdown
//! is signal → broadcast → both listeners drain and exit.

pub mod shutdown;

pub use shutdown::Shutdown;
