//! Mapping of service errors onto HTTP responses.

use crate::bridge::BridgeError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Product(#[from] ProductError),

    /// Request body could not be read as the expected JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Order(OrderError::InvalidOrder(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Order(OrderError::NotFound(_)) | Self::Product(ProductError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Order(OrderError::Lookup(BridgeError::LookupTimeout { .. })) => StatusCode::GATEWAY_TIMEOUT,
            Self::Order(OrderError::Lookup(BridgeError::PublishFailure { .. })) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Order(OrderError::Lookup(_) | OrderError::Store(_)) | Self::Product(ProductError::Store(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let correlation_id = match &self {
                Self::Order(OrderError::Lookup(e)) => e.correlation_id().map(|id| id.to_string()),
                _ => None,
            };
            tracing::error!(error = %self, ?correlation_id, %status, "Request failed");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::CorrelationId;
    use crate::model::{OrderId, ProductId};
    use message_bus::TransportError;
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        let timeout = BridgeError::LookupTimeout {
            correlation_id: CorrelationId::new(),
            subject_id: "1".into(),
            elapsed: Duration::from_secs(10),
        };
        let publish = BridgeError::PublishFailure {
            correlation_id: CorrelationId::new(),
            source: TransportError::Closed {
                topic: "product-details-request".into(),
            },
        };

        let cases = [
            (ApiError::from(OrderError::InvalidOrder("empty".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(OrderError::NotFound(OrderId(1))), StatusCode::NOT_FOUND),
            (ApiError::from(ProductError::NotFound(ProductId(1))), StatusCode::NOT_FOUND),
            (ApiError::from(OrderError::Lookup(timeout)), StatusCode::GATEWAY_TIMEOUT),
            (ApiError::from(OrderError::Lookup(publish)), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::from(OrderError::Store("gone".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::BadRequest("eof".into()), StatusCode::BAD_REQUEST),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
