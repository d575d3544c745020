//! # Cross-Service Lookup Bridge
//!
//! Request/reply on top of one-way pub/sub. A caller asks for the details of a subject
//! (a product id) and gets back a single awaitable answer, although underneath the
//! request and its reply travel on two unrelated topics.
//!
//! ```text
//!   caller ──request_details("1")──▶ LookupBridge
//!                                     │ register(correlation id) in PendingTable
//!                                     │ publish {subjectId, correlationId}
//!                                     ▼
//!                           product-details-request ──▶ ProductResponder
//!                                                          │ lookup in product store
//!                           product-details-response ◀─────┘ {correlationId, found, payload}
//!                                     │
//!   reply listener ──on_details_available──▶ PendingTable::fulfill ──▶ caller wakes
//! ```
//!
//! Each call has its own correlation id, so any number of lookups can be in flight
//! and replies may arrive in any order. A reply only ever resolves the call whose id it
//! carries. Late, duplicated and unknown replies are discarded.
//!
//! - [`correlation`] - [`CorrelationId`]
//! - [`wire`] - the JSON messages
//! - [`pending`] - the in-flight table
//! - [`lookup`] - [`LookupBridge`] itself

pub mod correlation;
pub mod lookup;
pub mod pending;
pub mod wire;

pub use correlation::CorrelationId;
pub use lookup::{BridgeSettings, LookupBridge};
pub use pending::{BridgeStats, PendingState, PendingTable};
pub use wire::{DetailsReply, DetailsRequest};

use async_trait::async_trait;
use message_bus::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Answer of the product service for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupReply {
    /// Raw JSON of the product, exactly as the responder sent it.
    Found(String),
    /// The responder answered that nothing matches the subject.
    Missing,
}

/// What became of one incoming reply message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyDisposition {
    /// Resolved the waiting call it belongs to.
    Delivered,
    /// Matched no waiting call.
    Stale,
    /// Could not be decoded.
    Malformed,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    /// No reply arrived before the deadline.
    #[error("No details for subject {subject_id} after {elapsed:?} (correlation {correlation_id})")]
    LookupTimeout {
        correlation_id: CorrelationId,
        subject_id: String,
        elapsed: Duration,
    },

    /// The request could not be handed to the transport.
    #[error("Could not publish details request {correlation_id}: {source}")]
    PublishFailure {
        correlation_id: CorrelationId,
        source: TransportError,
    },

    #[error("Could not encode details request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The reply slot was dropped without an answer.
    #[error("Lookup {correlation_id} ended without an answer")]
    Closed { correlation_id: CorrelationId },
}

impl BridgeError {
    pub fn correlation_id(&self) -> Option<CorrelationId> {
        match self {
            BridgeError::LookupTimeout { correlation_id, .. }
            | BridgeError::PublishFailure { correlation_id, .. }
            | BridgeError::Closed { correlation_id } => Some(*correlation_id),
            BridgeError::Encode(_) => None,
        }
    }
}

/// The lookup seam the order service depends on.
///
/// [`LookupBridge`] is the real implementation; tests substitute scripted ones.
#[async_trait]
pub trait DetailsLookup: Send + Sync {
    async fn request_details(&self, subject_id: &str) -> Result<LookupReply, BridgeError>;
}
