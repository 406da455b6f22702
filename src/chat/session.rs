//! Chat session management over STOMP-on-WebSocket.
//!
//! A [`ChatSession`] owns the transport handle for one room. Opening
//! the session performs the WebSocket and STOMP handshakes and hands
//! back the inbound event stream; the session keeps the write half for
//! publishing and teardown.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::SinkExt;
use futures::stream::{self, SplitSink, SplitStream, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::chat::frame::Frame;
use crate::error::{Error, Result};
use crate::observability;
use crate::types::{ChatMessage, ChatPublish};

/// Delay before callers should retry a failed connect.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// The inbound side of a chat session: a lazy, unbounded,
/// non-restartable sequence of decoded chat messages, in the order the
/// transport delivered them. The stream ends when the transport
/// closes.
pub type ChatEvents = Pin<Box<dyn Stream<Item = Result<ChatMessage>> + Send>>;

/// Connection state of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport; `open` may be called.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Subscribed and able to publish.
    Connected,
    /// Torn down, either explicitly or by the transport.
    Closed,
}

/// A chat session bound to one room on the broker.
pub struct ChatSession {
    ws_url: String,
    room_id: String,
    state: ConnectionState,
    sink: Option<WsSink>,
    // Set by the event stream when the transport ends so the write
    // side observes the closure.
    remote_closed: Arc<AtomicBool>,
}

impl ChatSession {
    /// Creates a session for the given broker URL and room.
    pub fn new(ws_url: impl Into<String>, room_id: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            room_id: room_id.into(),
            state: ConnectionState::Disconnected,
            sink: None,
            remote_closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The room this session is bound to.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// The current connection state.
    pub fn state(&self) -> ConnectionState {
        if self.state == ConnectionState::Connected && self.remote_closed.load(Ordering::Acquire) {
            ConnectionState::Closed
        } else {
            self.state
        }
    }

    /// The subscribe destination for this room.
    pub fn subscribe_destination(&self) -> String {
        format!("/sub/chat/room/{}", self.room_id)
    }

    /// The publish destination for this room.
    pub fn publish_destination(&self) -> String {
        format!("/pub/chatroom.{}", self.room_id)
    }

    /// Connect, authenticate, and subscribe to the room.
    ///
    /// On success the session is Connected and the returned stream
    /// yields inbound messages until the transport closes. On failure
    /// the session returns to Disconnected; callers may retry after
    /// [`RECONNECT_DELAY`].
    pub async fn open(&mut self, access_token: &str) -> Result<ChatEvents> {
        if self.state != ConnectionState::Disconnected {
            return Err(Error::transport("chat session already opened", None));
        }
        self.state = ConnectionState::Connecting;

        match self.handshake(access_token).await {
            Ok((sink, source)) => {
                observability::CHAT_CONNECTS.click();
                tracing::info!(room_id = %self.room_id, "joined chat room");
                self.sink = Some(sink);
                self.state = ConnectionState::Connected;
                Ok(events(source, self.remote_closed.clone()))
            }
            Err(err) => {
                observability::CHAT_CONNECT_FAILURES.click();
                self.state = ConnectionState::Disconnected;
                Err(err)
            }
        }
    }

    async fn handshake(&self, access_token: &str) -> Result<(WsSink, WsSource)> {
        let (mut ws, _response) = connect_async(&self.ws_url).await.map_err(|e| {
            Error::connection(
                format!("Failed to connect to chat broker at {}: {}", self.ws_url, e),
                Some(Box::new(e)),
            )
        })?;

        let host = url::Url::parse(&self.ws_url)?
            .host_str()
            .unwrap_or("localhost")
            .to_string();
        let connect = Frame::connect(&host, access_token);
        ws.send(Message::Text(connect.encode()))
            .await
            .map_err(|e| {
                Error::transport(format!("Failed to send CONNECT: {}", e), Some(Box::new(e)))
            })?;

        // Wait for the broker's answer before subscribing.
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => match Frame::parse(&text)? {
                    None => continue,
                    Some(frame) if frame.command == "CONNECTED" => break,
                    Some(frame) if frame.command == "ERROR" => {
                        let message = frame
                            .header("message")
                            .map(str::to_string)
                            .unwrap_or_else(|| frame.body.clone());
                        return Err(Error::transport(
                            format!("broker refused connection: {message}"),
                            None,
                        ));
                    }
                    Some(frame) => {
                        tracing::debug!(command = %frame.command, "ignoring frame during handshake");
                    }
                },
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    return Err(Error::transport("connection closed during handshake", None));
                }
                Some(Ok(Message::Frame(_))) => continue,
                Some(Err(e)) => {
                    return Err(Error::transport(
                        format!("WebSocket error during handshake: {}", e),
                        Some(Box::new(e)),
                    ));
                }
            }
        }

        let subscribe = Frame::subscribe("0", &self.subscribe_destination());
        ws.send(Message::Text(subscribe.encode()))
            .await
            .map_err(|e| {
                Error::transport(
                    format!("Failed to subscribe to room: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(ws.split())
    }

    /// Publish a TALK message to the room.
    ///
    /// Valid only in the Connected state; anything else fails with
    /// [`Error::NotConnected`].
    pub async fn send_text(&mut self, content: &str) -> Result<()> {
        if self.state() != ConnectionState::Connected {
            return Err(Error::NotConnected);
        }

        let publish = ChatPublish::talk(&self.room_id, content);
        let body = serde_json::to_string(&publish)?;
        let frame = Frame::send(&self.publish_destination(), &body);

        let sink = self.sink.as_mut().ok_or(Error::NotConnected)?;
        sink.send(Message::Text(frame.encode())).await.map_err(|e| {
            Error::transport(
                format!("Failed to publish message: {}", e),
                Some(Box::new(e)),
            )
        })?;
        observability::CHAT_MESSAGES_OUT.click();
        Ok(())
    }

    /// Tear the session down, releasing the transport handle.
    ///
    /// Safe to call on every exit path; closing an already-closed
    /// session is a no-op. Dropping the session also drops the handle.
    pub async fn close(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            // Best effort: the broker may already be gone.
            let _ = sink.send(Message::Text(Frame::disconnect().encode())).await;
            let _ = sink.close().await;
            tracing::info!(room_id = %self.room_id, "chat session closed");
        }
        self.state = ConnectionState::Closed;
    }
}

/// Wrap the read half into the inbound event stream.
fn events(source: WsSource, closed: Arc<AtomicBool>) -> ChatEvents {
    let stream = stream::unfold((source, closed), |(mut source, closed)| async move {
        loop {
            match source.next().await {
                Some(Ok(Message::Text(text))) => match Frame::parse(&text) {
                    Ok(None) => continue,
                    Ok(Some(frame)) => match frame.command.as_str() {
                        "MESSAGE" => {
                            observability::CHAT_MESSAGES_IN.click();
                            let event =
                                serde_json::from_str::<ChatMessage>(&frame.body).map_err(|e| {
                                    Error::serialization(
                                        format!("Failed to parse chat message: {}", e),
                                        Some(Box::new(e)),
                                    )
                                });
                            return Some((event, (source, closed)));
                        }
                        "ERROR" => {
                            closed.store(true, Ordering::Release);
                            let message = frame
                                .header("message")
                                .map(str::to_string)
                                .unwrap_or_else(|| frame.body.clone());
                            return Some((
                                Err(Error::transport(format!("broker error: {message}"), None)),
                                (source, closed),
                            ));
                        }
                        _ => {
                            tracing::debug!(command = %frame.command, "ignoring frame");
                        }
                    },
                    Err(err) => return Some((Err(err), (source, closed))),
                },
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_))) => continue,
                Some(Ok(Message::Frame(_))) => continue,
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "chat transport closed");
                    closed.store(true, Ordering::Release);
                    return None;
                }
                Some(Err(e)) => {
                    closed.store(true, Ordering::Release);
                    return Some((
                        Err(Error::transport(
                            format!("WebSocket receive error: {}", e),
                            Some(Box::new(e)),
                        )),
                        (source, closed),
                    ));
                }
                None => {
                    closed.store(true, Ordering::Release);
                    return None;
                }
            }
        }
    });
    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_disconnected() {
        let session = ChatSession::new("ws://localhost:8080/ws", "42");
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(session.room_id(), "42");
    }

    #[test]
    fn destinations_follow_room_id() {
        let session = ChatSession::new("ws://localhost:8080/ws", "42");
        assert_eq!(session.subscribe_destination(), "/sub/chat/room/42");
        assert_eq!(session.publish_destination(), "/pub/chatroom.42");
    }

    #[tokio::test]
    async fn send_text_before_open_is_not_connected() {
        let mut session = ChatSession::new("ws://localhost:8080/ws", "42");
        let err = session.send_text("hi").await.unwrap_err();
        assert!(err.is_not_connected());
    }

    #[tokio::test]
    async fn close_before_open_is_terminal() {
        let mut session = ChatSession::new("ws://localhost:8080/ws", "42");
        session.close().await;
        assert_eq!(session.state(), ConnectionState::Closed);

        // Closed sessions neither publish nor reopen.
        assert!(session.send_text("hi").await.unwrap_err().is_not_connected());
        assert!(session.open("A1").await.is_err());
    }
}
