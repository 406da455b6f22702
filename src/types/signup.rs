use serde::{Deserialize, Serialize};

/// Self-declared gender, used for match grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// Request body for `POST /api/user/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Email address used as the login identifier.
    pub email: String,

    /// Plaintext password, sent over TLS only.
    pub password: String,

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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_wire_names() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), r#""MALE""#);
        assert_eq!(
            serde_json::to_string(&Gender::Female).unwrap(),
            r#""FEMALE""#
        );
        assert_eq!(
            serde_json::to_string(&Gender::Unknown).unwrap(),
            r#""UNKNOWN""#
        );
    }

    #[test]
    fn signup_request_serialization() {
        let request = SignupRequest {
            email: "u@x.com".to_string(),
            password: "p".to_string(),
            nickname: "nick".to_string(),
            gender: Gender::Female,
            age: 25,
            phone_number: "01012345678".to_string(),
            profile_image_url: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["phoneNumber"], "01012345678");
        assert_eq!(json["gender"], "FEMALE");
        assert!(json.get("profileImageUrl").is_none());
    }
}
