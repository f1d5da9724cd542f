//! Response envelope shared by every endpoint.

use axum::Json;
use serde::Serialize;

/// Uniform response body: `{ success, data, message }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// A successful response carrying data.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    /// A successful response carrying data and a human-readable message.
    pub fn success_with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        })
    }
}

impl Envelope<()> {
    /// A successful response with only a message.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(message.into()),
        })
    }

    /// A failure body; pair it with the right status code.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let Json(envelope) = Envelope::success(serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = Envelope::failure("Erro");
        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Erro");
        assert!(json.get("data").is_none());
    }
}
