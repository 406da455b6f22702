//! Error types for the TableMate client.
//!
//! This module defines the error type used throughout the crate for
//! everything that can go wrong while talking to the TableMate API or
//! the chat broker.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// The main error type for the TableMate client.
#[derive(Clone, Debug)]
pub enum Error {
    /// The server answered with a non-2xx status outside the handled
    /// 401-refresh case.
    Http {
        /// HTTP status code.
        status: u16,
        /// Human-readable message, taken from the response envelope
        /// when the server provided one.
        message: String,
    },

    /// A 401 survived the refresh-and-retry cycle. The stored
    /// credentials have been cleared; the caller must treat the
    /// session as unauthenticated.
    AuthExpired {
        /// Human-readable error message.
        message: String,
    },

    /// A refresh was attempted with no refresh token stored.
    NoRefreshToken,

    /// A chat operation was attempted outside the Connected state.
    NotConnected,

    /// The request exceeded the client timeout.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// The transport could not reach the server.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Error during JSON serialization or deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// HTTP client error that fits none of the above.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },

    /// WebSocket or STOMP-level error on the chat transport.
    Transport {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Error::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new auth-expired error.
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Error::AuthExpired {
            message: message.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Creates a new chat transport error.
    pub fn transport(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Transport {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Returns true if this error is an HTTP status error.
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http { .. })
    }

    /// Returns true if this error means the session is no longer
    /// authenticated.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::AuthExpired { .. } | Error::NoRefreshToken)
    }

    /// Returns true if this error is a missing-refresh-token error.
    pub fn is_no_refresh_token(&self) -> bool {
        matches!(self, Error::NoRefreshToken)
    }

    /// Returns true if this error is a not-connected chat error.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Error::NotConnected)
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Returns true if this error is a chat transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Returns the HTTP status code associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http { status, message } => {
                write!(f, "HTTP {status}: {message}")
            }
            Error::AuthExpired { message } => {
                write!(f, "Session expired: {message}")
            }
            Error::NoRefreshToken => {
                write!(f, "No refresh token stored")
            }
            Error::NotConnected => {
                write!(f, "Chat session is not connected")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
            Error::Transport { message, .. } => {
                write!(f, "Transport error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            Error::Transport { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for TableMate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display() {
        let err = Error::http(404, "no such user");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_http());
        assert_eq!(err.to_string(), "HTTP 404: no such user");
    }

    #[test]
    fn auth_expired_covers_missing_refresh_token() {
        assert!(Error::auth_expired("refresh rejected").is_auth_expired());
        assert!(Error::NoRefreshToken.is_auth_expired());
        assert!(Error::NoRefreshToken.is_no_refresh_token());
        assert!(!Error::http(500, "boom").is_auth_expired());
    }

    #[test]
    fn not_connected_display() {
        let err = Error::NotConnected;
        assert!(err.is_not_connected());
        assert_eq!(err.to_string(), "Chat session is not connected");
    }

    #[test]
    fn io_error_source_preserved() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "tokens.json");
        let err = Error::from(io_err);
        assert!(error::Error::source(&err).is_some());
    }
}
