//! Minimal STOMP 1.2 frame codec.
//!
//! Covers exactly the frames the chat broker exchange needs: CONNECT /
//! CONNECTED, SUBSCRIBE, SEND, MESSAGE, ERROR, and DISCONNECT. Each
//! WebSocket text message carries at most one frame; a bare newline is
//! a heart-beat and decodes to nothing.

use crate::error::{Error, Result};

/// A single STOMP frame: command, headers, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame command (CONNECT, MESSAGE, ...).
    pub command: String,
    /// Header name/value pairs in wire order.
    pub headers: Vec<(String, String)>,
    /// The frame body, empty for most control frames.
    pub body: String,
}

impl Frame {
    /// Creates a new frame with no headers and an empty body.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Appends a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the first header with the given name, if any.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The CONNECT frame opening a session against the broker.
    pub fn connect(host: &str, access_token: &str) -> Self {
        Frame::new("CONNECT")
            .with_header("accept-version", "1.2")
            .with_header("host", host)
            .with_header("Authorization", format!("Bearer {access_token}"))
    }

    /// A SUBSCRIBE frame for the given destination.
    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new("SUBSCRIBE")
            .with_header("id", id)
            .with_header("destination", destination)
    }

    /// A SEND frame carrying a JSON body to the given destination.
    pub fn send(destination: &str, body: &str) -> Self {
        Frame::new("SEND")
            .with_header("destination", destination)
            .with_header("content-type", "application/json")
            .with_header("content-length", body.len().to_string())
            .with_body(body)
    }

    /// The DISCONNECT frame for a graceful teardown.
    pub fn disconnect() -> Self {
        Frame::new("DISCONNECT")
    }

    /// Encode the frame for the wire.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(&self.command);
        out.push('\n');
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push(':');
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Decode one WebSocket text message into a frame.
    ///
    /// Returns `Ok(None)` for heart-beats. Header values are taken
    /// verbatim; the destinations used here never need STOMP escape
    /// sequences.
    pub fn parse(input: &str) -> Result<Option<Frame>> {
        let input = input.strip_suffix('\0').unwrap_or(input);
        if input.is_empty() || input == "\n" || input == "\r\n" {
            return Ok(None);
        }

        let (head, body) = match input.split_once("\n\n") {
            Some((head, body)) => (head, body),
            None => {
                return Err(Error::transport(
                    "malformed STOMP frame: missing header terminator",
                    None,
                ));
            }
        };

        let mut lines = head.lines().map(|line| line.trim_end_matches('\r'));
        let command = match lines.next() {
            Some(command) if !command.is_empty() => command.to_string(),
            _ => {
                return Err(Error::transport("malformed STOMP frame: empty command", None));
            }
        };

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) => headers.push((name.to_string(), value.to_string())),
                None => {
                    return Err(Error::transport(
                        format!("malformed STOMP header: {line}"),
                        None,
                    ));
                }
            }
        }

        Ok(Some(Frame {
            command,
            headers,
            body: body.to_string(),
        }))
    }
}
