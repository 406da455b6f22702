//! Output rendering for the console clients.
//!
//! This module provides a trait-based rendering abstraction so the
//! binaries can share one output style and tests can capture output.
//! The default implementation uses ANSI escape codes, with a plain
//! mode for piping.

use std::io::{self, Stdout, Write};

use crate::types::ChatMessage;

/// ANSI escape code for dim text (used for status detail).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for senders).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for success messages).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering console output.
pub trait Renderer: Send {
    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a success message.
    fn print_success(&mut self, message: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an inbound chat message.
    fn print_chat_message(&mut self, message: &ChatMessage);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn writeln_styled(&mut self, style: &str, text: &str) {
        if self.use_color {
            let _ = writeln!(self.stdout, "{style}{text}{ANSI_RESET}");
        } else {
            let _ = writeln!(self.stdout, "{text}");
        }
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_info(&mut self, info: &str) {
        self.writeln_styled(ANSI_DIM, info);
    }

    fn print_success(&mut self, message: &str) {
        self.writeln_styled(ANSI_GREEN, message);
    }

    fn print_error(&mut self, error: &str) {
        self.writeln_styled(ANSI_RED, &format!("error: {error}"));
    }

    fn print_chat_message(&mut self, message: &ChatMessage) {
        let sender = message.sender.as_deref().unwrap_or("anonymous");
        if self.use_color {
            let _ = writeln!(
                self.stdout,
                "{ANSI_CYAN}[{sender}]{ANSI_RESET} {}",
                message.content
            );
        } else {
            let _ = writeln!(self.stdout, "[{sender}] {}", message.content);
        }
        let _ = self.stdout.flush();
    }
}
