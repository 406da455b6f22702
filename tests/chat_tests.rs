//! Integration tests for the chat session, driven against an
//! in-process stub STOMP broker.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use tablemate::chat::{ChatSession, ConnectionState, Frame};

/// What the stub broker should do after the handshake.
#[derive(Default)]
struct BrokerScript {
    /// Refuse the CONNECT with an ERROR frame.
    refuse: bool,
    /// MESSAGE bodies to deliver right after the subscription.
    deliver: Vec<String>,
    /// Close the connection after delivering.
    close_after_deliver: bool,
}

/// Spawn a one-connection stub broker.
///
/// Every frame the broker receives (CONNECT, SUBSCRIBE, SEND, ...) is
/// forwarded on the returned channel so tests can assert on it.
async fn spawn_broker(script: BrokerScript) -> (String, mpsc::UnboundedReceiver<Frame>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        // CONNECT
        let connect = read_frame(&mut ws).await.expect("expected CONNECT");
        let _ = tx.send(connect);
        if script.refuse {
            let error = Frame::new("ERROR").with_header("message", "forbidden");
            ws.send(Message::Text(error.encode())).await.unwrap();
            let _ = ws.close(None).await;
            return;
        }
        let connected = Frame::new("CONNECTED").with_header("version", "1.2");
        ws.send(Message::Text(connected.encode())).await.unwrap();

        // SUBSCRIBE
        let subscribe = read_frame(&mut ws).await.expect("expected SUBSCRIBE");
        let destination = subscribe
            .header("destination")
            .unwrap_or_default()
            .to_string();
        let _ = tx.send(subscribe);

        for (i, body) in script.deliver.iter().enumerate() {
            let message = Frame::new("MESSAGE")
                .with_header("destination", destination.clone())
                .with_header("message-id", i.to_string())
                .with_header("subscription", "0")
                .with_body(body.clone());
            ws.send(Message::Text(message.encode())).await.unwrap();
        }
        if script.close_after_deliver {
            let _ = ws.close(None).await;
            return;
        }

        // Relay whatever the client publishes until it disconnects.
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                match Frame::parse(&text) {
                    Ok(Some(frame)) if frame.command == "DISCONNECT" => break,
                    Ok(Some(frame)) => {
                        let _ = tx.send(frame);
                    }
                    _ => {}
                }
            }
        }
    });

    (format!("ws://{addr}"), rx)
}

async fn read_frame(
    ws: &mut tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
) -> Option<Frame> {
    while let Some(Ok(message)) = ws.next().await {
        if let Message::Text(text) = message {
            if let Ok(Some(frame)) = Frame::parse(&text) {
                return Some(frame);
            }
        }
    }
    None
}

#[tokio::test]
async fn handshake_authenticates_and_subscribes() {
    let (url, mut rx) = spawn_broker(BrokerScript::default()).await;
    let mut session = ChatSession::new(url, "42");

    let _events = session.open("A1").await.unwrap();
    assert_eq!(session.state(), ConnectionState::Connected);

    let connect = rx.recv().await.unwrap();
    assert_eq!(connect.command, "CONNECT");
    assert_eq!(connect.header("Authorization"), Some("Bearer A1"));

    let subscribe = rx.recv().await.unwrap();
    assert_eq!(subscribe.command, "SUBSCRIBE");
    assert_eq!(subscribe.header("destination"), Some("/sub/chat/room/42"));

    session.close().await;
    assert_eq!(session.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn inbound_messages_arrive_in_transport_order() {
    let script = BrokerScript {
        deliver: vec![
            r#"{"roomId":"42","sender":"alice","content":"first","type":"TALK"}"#.to_string(),
            r#"{"roomId":"42","sender":"bob","content":"second","type":"TALK"}"#.to_string(),
        ],
        ..BrokerScript::default()
    };
    let (url, _rx) = spawn_broker(script).await;
    let mut session = ChatSession::new(url, "42");

    let mut events = session.open("A1").await.unwrap();

    let first = events.next().await.unwrap().unwrap();
    assert_eq!(first.sender.as_deref(), Some("alice"));
    assert_eq!(first.content, "first");

    let second = events.next().await.unwrap().unwrap();
    assert_eq!(second.sender.as_deref(), Some("bob"));
    assert_eq!(second.content, "second");

    session.close().await;
}

#[tokio::test]
async fn send_text_publishes_talk_payload() {
    let (url, mut rx) = spawn_broker(BrokerScript::default()).await;
    let mut session = ChatSession::new(url, "42");

    let _events = session.open("A1").await.unwrap();
    session.send_text("hi").await.unwrap();

    // Skip the handshake frames the broker forwarded.
    let _connect = rx.recv().await.unwrap();
    let _subscribe = rx.recv().await.unwrap();

    let send = rx.recv().await.unwrap();
    assert_eq!(send.command, "SEND");
    assert_eq!(send.header("destination"), Some("/pub/chatroom.42"));
    let payload: serde_json::Value = serde_json::from_str(&send.body).unwrap();
    assert_eq!(
        payload,
        serde_json::json!({"roomId": "42", "content": "hi", "type": "TALK"})
    );

    session.close().await;
}

#[tokio::test]
async fn refused_connect_returns_to_disconnected() {
    let script = BrokerScript {
        refuse: true,
        ..BrokerScript::default()
    };
    let (url, _rx) = spawn_broker(script).await;
    let mut session = ChatSession::new(url, "42");

    let err = session.open("A1").await.err().unwrap();
    assert!(err.is_transport(), "got {err:?}");
    // Back to Disconnected: the caller may retry.
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn transport_close_ends_stream_and_session() {
    let script = BrokerScript {
        deliver: vec![r#"{"content":"bye"}"#.to_string()],
        close_after_deliver: true,
        ..BrokerScript::default()
    };
    let (url, _rx) = spawn_broker(script).await;
    let mut session = ChatSession::new(url, "42");

    let mut events = session.open("A1").await.unwrap();

    let last = events.next().await.unwrap().unwrap();
    assert_eq!(last.content, "bye");
    // The stream is non-restartable: once the transport closes it
    // yields nothing more.
    assert!(events.next().await.is_none());

    assert_eq!(session.state(), ConnectionState::Closed);
    let err = session.send_text("hi").await.unwrap_err();
    assert!(err.is_not_connected());
}
