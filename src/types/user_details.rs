use serde::{Deserialize, Serialize};

use crate::types::Gender;

/// Authorization role assigned by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

/// Payload of `GET /api/user/me/details` — the full account record,
/// including the contact fields the public profile omits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsResponse {
    /// Email address used as the login identifier.
    pub email: String,

    /// Display name shown to other users.
    pub nickname: String,

    /// Self-declared gender.
    pub gender: Gender,

    /// Age in years.
    pub age: u32,

    /// Phone number in local `010xxxxxxxx` form.
    pub phone_number: String,

    /// Optional profile image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,

    /// Authorization role.
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_details_deserialization() {
        let json = r#"{
            "email": "u@x.com",
            "nickname": "nick",
            "gender": "MALE",
            "age": 30,
            "phoneNumber": "01012345678",
            "role": "ROLE_USER"
        }"#;
        let details: UserDetailsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(details.email, "u@x.com");
        assert_eq!(details.gender, Gender::Male);
        assert_eq!(details.role, UserRole::User);
        assert!(details.profile_image_url.is_none());
    }
}
