//! Chat over STOMP-on-WebSocket.
//!
//! This module provides the room chat client used by the console
//! tools. It supports:
//!
//! - A single room subscription per session
//! - Publishing TALK messages to the room
//! - A lazy inbound event stream for the lifetime of the connection
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`frame`]: the minimal STOMP frame codec
//! - [`session`]: the connection state machine and room session
//! - [`config`]: CLI argument parsing for the chat binary

pub mod config;
pub mod frame;
pub mod session;

pub use config::{ChatArgs, ChatConfig};
pub use frame::Frame;
pub use session::{ChatEvents, ChatSession, ConnectionState, RECONNECT_DELAY};
