use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The kind of a chat message on the broker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChatMessageKind {
    /// Ordinary text sent by a participant.
    Talk,
    /// A participant joined the room.
    Enter,
    /// A participant left the room.
    Quit,
}

/// The payload published to `/pub/chatroom.{roomId}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatPublish {
    /// The room the message belongs to.
    pub room_id: String,

    /// The message text.
    pub content: String,

    /// Message kind, always TALK for user-typed text.
    #[serde(rename = "type")]
    pub kind: ChatMessageKind,
}

impl ChatPublish {
    /// Creates a TALK payload for the given room.
    pub fn talk<R: Into<String>, C: Into<String>>(room_id: R, content: C) -> Self {
        Self {
            room_id: room_id.into(),
            content: content.into(),
            kind: ChatMessageKind::Talk,
        }
    }
}

/// A message delivered on `/sub/chat/room/{roomId}`.
///
/// Only `content` is guaranteed; the broker decorates messages with
/// sender and timestamp when it has them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// The room the message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,

    /// Nickname of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// The message text.
    pub content: String,

    /// Message kind.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChatMessageKind>,

    /// Server-side receive time.
    #[serde(
        default,
        with = "crate::utils::time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn talk_payload_wire_shape() {
        let publish = ChatPublish::talk("42", "hi");
        let json = serde_json::to_string(&publish).unwrap();
        assert_eq!(json, r#"{"roomId":"42","content":"hi","type":"TALK"}"#);
    }

    #[test]
    fn inbound_message_minimal() {
        let json = r#"{"content":"hello"}"#;
        let message: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.content, "hello");
        assert!(message.sender.is_none());
        assert!(message.kind.is_none());
        assert!(message.timestamp.is_none());
    }

    #[test]
    fn inbound_message_decorated() {
        let json = r#"{
            "roomId": "42",
            "sender": "nick",
            "content": "hello",
            "type": "TALK",
            "timestamp": "2025-06-01T12:00:00Z"
        }"#;
        let message: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.room_id.as_deref(), Some("42"));
        assert_eq!(message.sender.as_deref(), Some("nick"));
        assert_eq!(message.kind, Some(ChatMessageKind::Talk));
        assert!(message.timestamp.is_some());
    }
}
