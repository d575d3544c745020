//! # Product Query Responder
//!
//! The product side of the lookup bridge. Listens on the request topic, looks the
//! subject up in the product store and publishes the answer, carrying the request's
//! correlation id, on the reply topic.
//!
//! ```text
//! IDLE ──request──▶ LOOKUP ──found / not found──▶ REPLY_SENT ──▶ IDLE
//! ```
//!
//! Failures never stop the listener. The request is dropped and the waiting caller
//! runs into its own timeout.

use crate::bridge::{DetailsReply, DetailsRequest};
use crate::clients::ProductClient;
use crate::model::ProductId;
use crate::product_actor::ProductError;
use actor_framework::ActorClient;
use message_bus::{MessageBus, TransportError};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum ResponderError {
    /// The request text is not a details request; there is nobody to answer.
    #[error("Undecodable details request: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Could not serialize product: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] ProductError),

    #[error(transparent)]
    Publish(#[from] TransportError),
}

/// Whether the subject of an answered request exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Found,
    NotFound,
}

#[derive(Clone)]
pub struct ProductResponder {
    products: ProductClient,
    bus: Arc<dyn MessageBus>,
    request_topic: String,
    reply_topic: String,
}

impl ProductResponder {
    pub fn new(
        products: ProductClient,
        bus: Arc<dyn MessageBus>,
        request_topic: impl Into<String>,
        reply_topic: impl Into<String>,
    ) -> Self {
        Self {
            products,
            bus,
            request_topic: request_topic.into(),
            reply_topic: reply_topic.into(),
        }
    }

    /// Answers one raw request message.
    ///
    /// A subject id that cannot name a product is answered as not found.
    #[instrument(skip(self, raw), fields(correlation_id = tracing::field::Empty))]
    pub async fn handle_request(&self, raw: &str) -> Result<Answer, ResponderError> {
        let request = DetailsRequest::from_json(raw).map_err(ResponderError::Decode)?;
        let correlation_id = request.correlation_id;
        tracing::Span::current().record("correlation_id", tracing::field::display(correlation_id));
        debug!(subject_id = %request.subject_id, "Lookup");

        let product = match request.subject_id.parse::<ProductId>() {
            Ok(id) => self.products.get(id).await?,
            Err(_) => {
                debug!(subject_id = %request.subject_id, "Subject id names no product");
                None
            }
        };

        let (reply, answer) = match product {
            Some(product) => {
                let payload = serde_json::to_string(&product).map_err(ResponderError::Encode)?;
                (DetailsReply::found(correlation_id, payload), Answer::Found)
            }
            None => (DetailsReply::not_found(correlation_id), Answer::NotFound),
        };

        let raw_reply = reply.to_json().map_err(ResponderError::Encode)?;
        self.bus.publish(&self.reply_topic, raw_reply).await?;
        debug!(?answer, "Reply sent");
        Ok(answer)
    }

    /// Starts the request listener. The subscription exists when this returns.
    ///
    /// The task ends when the transport closes.
    pub fn listen(self) -> JoinHandle<()> {
        let mut subscription = self.bus.subscribe(&self.request_topic);

        tokio::spawn(async move {
            info!(topic = %self.request_topic, "Product responder started");
            while let Some(message) = subscription.recv().await {
                match self.handle_request(&message.payload).await {
                    Ok(_) => {}
                    Err(e @ ResponderError::Decode(_)) => {
                        warn!(error = %e, "Details request dropped");
                    }
                    Err(e) => {
                        error!(error = %e, "Details request failed");
                    }
                }
            }
            info!(topic = %self.request_topic, "Product responder stopped");
        })
    }
}
