//! Startup, wiring and shutdown of the running system.

pub mod order_system;
pub mod tracing;

pub use order_system::OrderSystem;
pub use tracing::setup_tracing;
