//! # Write Request Model
//!
//! The externally owned request value intercepted by the validation step.
//! The step may replace `data.body` in place with a normalized value; it
//! never touches `collection`, `request_id`, or the request's identity.
//! The caller keeps ownership throughout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An inbound write request, keyed by its target collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteRequest {
    /// Host-assigned request identifier. Passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Target collection name. Selects the schema; never modified.
    pub collection: String,

    /// Request payload.
    pub data: RequestData,
}

/// Payload of a write request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    /// Document body to validate. Successful validation may replace this
    /// with the schema's normalized output.
    pub body: Value,
}

impl WriteRequest {
    /// Create a request for `collection` carrying `body`.
    pub fn new(collection: impl Into<String>, body: Value) -> Self {
        Self {
            request_id: None,
            collection: collection.into(),
            data: RequestData { body },
        }
    }

    /// Attach a host-assigned request identifier.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
