use serde::{Deserialize, Serialize};

/// The credential pair issued on login and replaced on refresh.
///
/// The two tokens travel together: the access token authorizes API
/// calls, the refresh token is only ever sent to the refresh and
/// logout endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Short-lived bearer credential attached to authenticated requests.
    pub access_token: String,

    /// Longer-lived credential exchanged for a new access token.
    pub refresh_token: String,
}

impl AuthTokens {
    /// Creates a new token pair.
    pub fn new<A: Into<String>, R: Into<String>>(access_token: A, refresh_token: R) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let tokens = AuthTokens::new("A1", "R1");
        let json = serde_json::to_string(&tokens).unwrap();
        assert_eq!(json, r#"{"accessToken":"A1","refreshToken":"R1"}"#);
    }
}
