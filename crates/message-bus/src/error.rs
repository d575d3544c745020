//! Transport errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The transport was shut down; nothing can be published any more.
    #[error("Transport closed, cannot publish to {topic}")]
    Closed { topic: String },
}
