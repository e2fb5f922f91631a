//! The backend's JSON response envelope.
//!
//! Every successful backend response wraps its payload as
//! `{ "data": T, "message": "..." }` with the message optional. Error
//! responses carry `{ "message": "..." }` at the top level.

use serde::{Deserialize, Serialize};

/// Successful response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// The payload.
    pub data: T,
    /// Optional human-readable message (e.g. "Item added to cart").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the envelope, discarding the message.
    pub fn into_data(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_message() {
        let json = r#"{"data": {"id": 1}, "message": "ok"}"#;
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(json).expect("deserialize");
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        assert_eq!(envelope.data["id"], 1);
    }

    #[test]
    fn test_envelope_without_message() {
        let json = r#"{"data": [1, 2, 3]}"#;
        let envelope: ApiEnvelope<Vec<i32>> = serde_json::from_str(json).expect("deserialize");
        assert!(envelope.message.is_none());
        assert_eq!(envelope.into_data(), vec![1, 2, 3]);
    }
}
