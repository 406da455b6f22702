use serde::{Deserialize, Serialize};

/// Request body for `PUT /api/user/phone-number`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberUpdateRequest {
    /// The new phone number in local `010xxxxxxxx` form.
    pub new_phone_number: String,

    /// Current password, for re-authentication.
    pub current_password: String,
}

impl PhoneNumberUpdateRequest {
    /// Creates a new phone number update request.
    pub fn new<N: Into<String>, P: Into<String>>(
        new_phone_number: N,
        current_password: P,
    ) -> Self {
        Self {
            new_phone_number: new_phone_number.into(),
            current_password: current_password.into(),
        }
    }
}

/// Payload of a successful phone number update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberResponse {
    /// The updated phone number.
    pub phone_number: String,
}
