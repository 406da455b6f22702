use serde::{Deserialize, Serialize};

/// Request body for `POST /api/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The stored refresh token.
    pub refresh_token: String,
}

impl RefreshRequest {
    /// Creates a new refresh request.
    pub fn new<R: Into<String>>(refresh_token: R) -> Self {
        Self {
            refresh_token: refresh_token.into(),
        }
    }
}

/// Response payload of `POST /api/auth/refresh`.
///
/// The server always issues a new access token; whether it rotates the
/// refresh token is left to the server, so the field is optional and
/// the client keeps the old refresh token when it is absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// The newly issued access token.
    pub access_token: String,

    /// A rotated refresh token, if the server issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}
