use serde::{Deserialize, Serialize};

/// Request body for `PUT /api/user/password`.
///
/// A successful change invalidates the session; the caller must log in
/// again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// The current password.
    pub old_password: String,

    /// The replacement password.
    pub new_password: String,
}

impl ChangePasswordRequest {
    /// Creates a new password change request.
    pub fn new<O: Into<String>, N: Into<String>>(old_password: O, new_password: N) -> Self {
        Self {
            old_password: old_password.into(),
            new_password: new_password.into(),
        }
    }
}
