use serde::{Deserialize, Serialize};

/// Request body for `POST /api/auth/logout`.
///
/// Logout invalidates the server-side session keyed by the refresh
/// token, so the refresh token travels in the body rather than the
/// Authorization header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// The refresh token identifying the session to invalidate.
    pub refresh_token: String,
}

impl LogoutRequest {
    /// Creates a new logout request.
    pub fn new<R: Into<String>>(refresh_token: R) -> Self {
        Self {
            refresh_token: refresh_token.into(),
        }
    }
}
