//! Error types for the Order service.

use crate::bridge::BridgeError;
use crate::model::OrderId;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order is absent or has no items.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// Enrichment could not obtain product details.
    #[error(transparent)]
    Lookup(#[from] BridgeError),

    /// The order store failed or is gone.
    #[error("Order store error: {0}")]
    Store(String),
}
