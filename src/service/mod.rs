//! Services composing the stores with the lookup bridge.

pub mod order_service;

pub use order_service::*;
