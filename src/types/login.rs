use serde::{Deserialize, Serialize};

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Email address used as the login identifier.
    pub email: String,

    /// Plaintext password, sent over TLS only.
    pub password: String,
}

impl LoginRequest {
    /// Creates a new login request.
    pub fn new<E: Into<String>, P: Into<String>>(email: E, password: P) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}
