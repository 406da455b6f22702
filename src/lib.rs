// Public modules
pub mod chat;
pub mod client;
pub mod console;
pub mod error;
pub mod observability;
pub mod render;
pub mod store;
pub mod types;
pub mod utils;

// Re-exports
pub use client::ApiClient;
pub use error::{Error, Result};
pub use render::{PlainTextRenderer, Renderer};
pub use store::{CredentialStore, FileStore, MemoryStore};
pub use types::*;
