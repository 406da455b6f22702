use serde::{Deserialize, Serialize};

/// Request body for `PUT /api/user/email`.
///
/// Changing the login identifier requires the current password for
/// re-authentication; the server invalidates the session afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailUpdateRequest {
    /// The new email address.
    pub new_email: String,

    /// Current password, for re-authentication.
    pub current_password: String,
}

impl EmailUpdateRequest {
    /// Creates a new email update request.
    pub fn new<E: Into<String>, P: Into<String>>(new_email: E, current_password: P) -> Self {
        Self {
            new_email: new_email.into(),
            current_password: current_password.into(),
        }
    }
}

/// Payload of a successful email update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailResponse {
    /// The updated email address.
    pub email: String,
}
