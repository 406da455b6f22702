//! Configuration for the console client binary.

use std::env;
use std::path::PathBuf;

use arrrg_derive::CommandLine;

/// Default HTTP base address of the API server.
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default path of the token file.
const DEFAULT_TOKEN_FILE: &str = "tokens.json";

/// Command-line arguments for the tablemate-console tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ConsoleArgs {
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

/// Resolved configuration for a console run.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// HTTP base address of the API server.
    pub api_url: String,

    /// Path of the token file.
    pub token_file: PathBuf,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl From<ConsoleArgs> for ConsoleConfig {
    fn from(args: ConsoleArgs) -> Self {
        let api_url = args
            .api_url
            .or_else(|| env::var("TABLEMATE_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        ConsoleConfig {
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
        let config = ConsoleConfig::from(ConsoleArgs::default());
        assert_eq!(config.token_file, PathBuf::from("tokens.json"));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_custom_args() {
        let args = ConsoleArgs {
            api_url: Some("http://api:9000".to_string()),
            token_file: Some("/tmp/tokens.json".to_string()),
            no_color: true,
        };
        let config = ConsoleConfig::from(args);
        assert_eq!(config.api_url, "http://api:9000");
        assert_eq!(config.token_file, PathBuf::from("/tmp/tokens.json"));
        assert!(!config.use_color);
    }
}
