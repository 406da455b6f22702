use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The response wrapper used by every TableMate endpoint.
///
/// Successful responses carry a human-readable `message` and the
/// payload under `data`; message-only responses (password change,
/// logout) leave `data` null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// Human-readable status message.
    pub message: String,

    /// The payload, absent for message-only responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwraps the payload, failing if the server sent a message-only
    /// response where data was expected.
    pub fn into_data(self) -> Result<T> {
        self.data.ok_or_else(|| {
            Error::serialization(
                format!("response envelope has no data: {}", self.message),
                None,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_data() {
        let json = r#"{"message":"login ok","data":{"accessToken":"A1","refreshToken":"R1"}}"#;
        let envelope: Envelope<crate::types::AuthTokens> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.message, "login ok");
        let tokens = envelope.into_data().unwrap();
        assert_eq!(tokens.access_token, "A1");
        assert_eq!(tokens.refresh_token, "R1");
    }

    #[test]
    fn envelope_message_only() {
        let json = r#"{"message":"logout ok"}"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(envelope.data.is_none());
        assert!(envelope.into_data().is_err());
    }

    #[test]
    fn envelope_null_data() {
        let json = r#"{"message":"ok","data":null}"#;
        let envelope: Envelope<String> = serde_json::from_str(json).unwrap();
        assert!(envelope.data.is_none());
    }
}
