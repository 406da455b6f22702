//! Room chat client over STOMP-on-WebSocket.
//!
//! Joins one chat room with the access token saved by
//! tablemate-console, prints inbound messages as they arrive, and
//! publishes each typed line as a TALK message.
//!
//! # Usage
//!
//! ```bash
//! # Join room 42 on the default localhost broker
//! tablemate-chat --room 42
//!
//! # Against a specific broker
//! tablemate-chat --room 42 --ws-url ws://broker.example.com/ws
//! ```
//!
//! Type `/exit` (or press Ctrl+D) to leave the room.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use futures::StreamExt;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use tablemate::chat::{ChatArgs, ChatConfig, ChatSession, RECONNECT_DELAY};
use tablemate::store::CredentialStore;
use tablemate::{ApiClient, FileStore, PlainTextRenderer, Renderer};

/// Main entry point for the tablemate-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("tablemate-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let store = Arc::new(FileStore::open(&config.token_file));
    let Some(tokens) = store.get() else {
        eprintln!("No stored credentials; log in with tablemate-console first.");
        std::process::exit(1);
    };
    let client = ApiClient::with_options(store.clone(), Some(config.api_url.clone()), None)?;
    let mut access_token = tokens.access_token;

    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    let room_id = match config.room.clone() {
        Some(room) => room,
        None => {
            let line = rl.readline("Room ID: ")?;
            let line = line.trim().to_string();
            if line.is_empty() {
                eprintln!("A room ID is required.");
                std::process::exit(1);
            }
            line
        }
    };

    // Flag for interrupt handling during connect retries.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    // Connect, retrying on failure the way the browser client does. A
    // refused CONNECT usually means the access token went stale, so a
    // refresh is attempted between tries.
    let mut session = ChatSession::new(config.ws_url.clone(), room_id.clone());
    let events = loop {
        match session.open(&access_token).await {
            Ok(events) => break events,
            Err(err) => {
                renderer.print_error(&format!(
                    "connect failed: {err}; retrying in {}s",
                    RECONNECT_DELAY.as_secs()
                ));
                if err.is_transport() {
                    match client.refresh().await {
                        Ok(tokens) => access_token = tokens.access_token,
                        Err(err) => renderer.print_error(&format!("token refresh failed: {err}")),
                    }
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
                if interrupted.load(Ordering::Relaxed) {
                    return Ok(());
                }
            }
        }
    };

    renderer.print_success(&format!("Joined room {room_id}. Type /exit to leave."));

    // Inbound messages print from their own task while the input loop
    // blocks on the terminal.
    let printer = tokio::spawn(async move {
        let mut events = events;
        let mut renderer = PlainTextRenderer::with_color(use_color);
        while let Some(event) = events.next().await {
            match event {
                Ok(message) => renderer.print_chat_message(&message),
                Err(err) => renderer.print_error(&err.to_string()),
            }
        }
        renderer.print_info("chat connection closed");
    });

    loop {
        match rl.readline("[me] > ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if line == "/exit" || line == "/quit" {
                    break;
                }
                if let Err(err) = session.send_text(line).await {
                    renderer.print_error(&err.to_string());
                    if err.is_not_connected() {
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    // Release the transport on every exit path.
    session.close().await;
    printer.abort();
    println!("Goodbye!");
    Ok(())
}
