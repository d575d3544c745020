//! # Wire Format
//!
//! The two JSON messages exchanged over the bus.
//!
//! Request, on the request topic:
//!
//! ```json
//! { "subjectId": "1", "correlationId": "5f0c…" }
//! ```
//!
//! Reply, on the reply topic. `payload` is the product JSON as a string, or `null`
//! when `found` is false:
//!
//! ```json
//! { "correlationId": "5f0c…", "found": true, "payload": "{\"id\":1,…}" }
//! ```

use crate::bridge::CorrelationId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsRequest {
    pub subject_id: String,
    pub correlation_id: CorrelationId,
}

impl DetailsRequest {
    pub fn new(subject_id: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self {
            subject_id: subject_id.into(),
            correlation_id,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsReply {
    pub correlation_id: CorrelationId,
    pub found: bool,
    pub payload: Option<String>,
}

impl DetailsReply {
    pub fn found(correlation_id: CorrelationId, payload: String) -> Self {
        Self {
            correlation_id,
            found: true,
            payload: Some(payload),
        }
    }

    pub fn not_found(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            found: false,
            payload: None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_field_names() {
        let id = CorrelationId::new();
        let raw = DetailsRequest::new("1", id).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!({ "subjectId": "1", "correlationId": id.to_string() }));
    }

    #[test]
    fn test_not_found_reply_has_null_payload() {
        let id = CorrelationId::new();
        let raw = DetailsReply::not_found(id).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            json!({ "correlationId": id.to_string(), "found": false, "payload": null })
        );
    }

    #[test]
    fn test_reply_without_payload_field_decodes() {
        let id = CorrelationId::new();
        let raw = format!(r#"{{"correlationId":"{id}","found":false}}"#);
        assert_eq!(DetailsReply::from_json(&raw).unwrap(), DetailsReply::not_found(id));
    }

    #[test]
    fn test_reply_with_bad_correlation_id_is_rejected() {
        let raw = r#"{"correlationId":"42","found":true,"payload":"{}"}"#;
        assert!(DetailsReply::from_json(raw).is_err());
    }
}
