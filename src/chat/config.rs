//! Configuration for the chat client binary.
//!
//! This module provides CLI argument parsing via `arrrg` and the
//! resolved configuration for a chat run.

use std::env;
use std::path::PathBuf;

use arrrg_derive::CommandLine;

/// Default WebSocket endpoint of the chat broker.
const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws";

/// Default HTTP base address of the API server.
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default path of the token file shared with the console client.
const DEFAULT_TOKEN_FILE: &str = "tokens.json";

/// Command-line arguments for the tablemate-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Chat room to join.
    #[arrrg(optional, "Chat room ID to join (prompted if omitted)", "ROOM")]
    pub room: Option<String>,

    /// WebSocket endpoint of the chat broker.
    #[arrrg(optional, "Chat broker URL (default: ws://localhost:8080/ws)", "URL")]
    pub ws_url: Option<String>,

    /// HTTP base address of the API server.
    #[arrrg(optional, "API base URL (default: http://localhost:8080)", "URL")]
    pub api_url: Option<String>,

    /// Path of the token file.
    #[arrrg(optional, "Token file path (default: tokens.json)", "FILE")]
    pub token_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved configuration for a chat run.
///
/// Command-line values win over the TABLEMATE_WS_URL and
/// TABLEMATE_API_URL environment variables, which win over the
/// localhost defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Chat room to join, if given on the command line.
    pub room: Option<String>,

    /// WebSocket endpoint of the chat broker.
    pub ws_url: String,

    /// HTTP base address of the API server.
    pub api_url: String,

    /// Path of the token file.
    pub token_file: PathBuf,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let ws_url = args
            .ws_url
            .or_else(|| env::var("TABLEMATE_WS_URL").ok())
            .unwrap_or_else(|| DEFAULT_WS_URL.to_string());
        let api_url = args
            .api_url
            .or_else(|| env::var("TABLEMATE_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        ChatConfig {
            room: args.room,
            ws_url,
            api_url,
            token_file: PathBuf::from(
                args.token_file
                    .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string()),
            ),
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_default_args() {
        let config = ChatConfig::from(ChatArgs::default());
        assert!(config.room.is_none());
        assert_eq!(config.token_file, PathBuf::from("tokens.json"));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_custom_args() {
        let args = ChatArgs {
            room: Some("42".to_string()),
            ws_url: Some("ws://broker:9000/ws".to_string()),
            api_url: Some("http://api:9000".to_string()),
            token_file: Some("/tmp/tokens.json".to_string()),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.room.as_deref(), Some("42"));
        assert_eq!(config.ws_url, "ws://broker:9000/ws");
        assert_eq!(config.api_url, "http://api:9000");
        assert!(!config.use_color);
    }
}
