// Public modules
pub mod auth_tokens;
pub mod chat_message;
pub mod email;
pub mod envelope;
pub mod login;
pub mod logout;
pub mod password;
pub mod phone_number;
pub mod profile;
pub mod refresh;
pub mod signup;
pub mod user_details;

// Re-exports
pub use auth_tokens::AuthTokens;
pub use chat_message::{ChatMessage, ChatMessageKind, ChatPublish};
pub use email::{EmailResponse, EmailUpdateRequest};
pub use envelope::Envelope;
pub use login::LoginRequest;
pub use logout::LogoutRequest;
pub use password::ChangePasswordRequest;
pub use phone_number::{PhoneNumberResponse, PhoneNumberUpdateRequest};
pub use profile::{ProfileResponse, ProfileUpdateRequest};
pub use refresh::{RefreshRequest, RefreshResponse};
pub use signup::{Gender, SignupRequest};
pub use user_details::{UserDetailsResponse, UserRole};
