use serde::{Deserialize, Serialize};

/// Payload of `GET /api/user/profile` — the public subset of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Display name shown to other users.
    pub nickname: String,

    /// Optional profile image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Request body for `PUT /api/user/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    /// New display name.
    pub nickname: String,

    /// New profile image URL, or None to clear it.
    pub profile_image_url: Option<String>,
}

impl ProfileUpdateRequest {
    /// Creates a new profile update request.
    pub fn new<N: Into<String>>(nickname: N, profile_image_url: Option<String>) -> Self {
        Self {
            nickname: nickname.into(),
            profile_image_url,
        }
    }
}
