//! WebSocket transport for collaboration.
//!
//! Defines the tagged-JSON protocol spoken with the relay server and a
//! background-thread client that surfaces traffic as polled [`SyncEvent`]s.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Messages sent to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a room.
    Join { room: String },
    /// Leave the current room.
    Leave,
    /// Replicated-document payload (base64 encoded CRDT bytes).
    Sync { data: String },
    /// Presence update for this session.
    Awareness {
        session_id: Uuid,
        #[serde(flatten)]
        state: AwarenessState,
    },
}

/// Messages received from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms a room join with the current state.
    Joined {
        room: String,
        peer_count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_sync: Option<String>,
    },
    /// A session joined the room.
    PeerJoined { session_id: Uuid },
    /// A session left the room.
    PeerLeft { session_id: Uuid },
    /// Replicated-document payload from another session.
    Sync { from: Uuid, data: String },
    /// Presence update from another session.
    Awareness {
        from: Uuid,
        #[serde(flatten)]
        state: AwarenessState,
    },
    /// Server-side error.
    Error { message: String },
}

/// Ephemeral per-session presence state. Fields are optional so partial
/// updates merge into what a peer already published.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwarenessState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Cursor position in canvas coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Point>,
    /// Whether the session's media peer is ready to answer screen-share
    /// calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_ready: Option<bool>,
}

/// Connection state of the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events surfaced by the transport.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Connected to the server.
    Connected,
    /// Disconnected from the server.
    Disconnected,
    /// Joined a room; carries initial replicated-document bytes if the room
    /// has history.
    JoinedRoom {
        room: String,
        peer_count: usize,
        initial_sync: Option<Vec<u8>>,
    },
    /// A session joined the room.
    PeerJoined { session_id: Uuid },
    /// A session left the room.
    PeerLeft { session_id: Uuid },
    /// Replicated-document bytes from another session.
    SyncReceived { from: Uuid, data: Vec<u8> },
    /// Presence update from another session.
    AwarenessReceived { from: Uuid, state: AwarenessState },
    /// A transport or server error occurred.
    Error { message: String },
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("already connected")]
    AlreadyConnected,
    #[error("not connected")]
    NotConnected,
    #[error("invalid websocket url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("connection channel closed")]
    ChannelClosed,
}

/// Encode CRDT bytes for a JSON frame.
pub fn encode_payload(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode CRDT bytes from a JSON frame.
pub fn decode_payload(data: &str) -> Option<Vec<u8>> {
    BASE64.decode(data).ok()
}

/// Build the room endpoint from a server base URL, following the
/// `/{prefix}/{room}` path convention.
pub fn room_url(base: &str, room: &str) -> String {
    format!("{}/sync/{}", base.trim_end_matches('/'), room)
}

/// Translate a parsed server message into a transport event. Frames with
/// undecodable payloads are dropped.
fn event_from_message(msg: ServerMessage) -> Option<SyncEvent> {
    match msg {
        ServerMessage::Joined {
            room,
            peer_count,
            initial_sync,
        } => {
            let initial_sync = initial_sync.and_then(|s| decode_payload(&s));
            Some(SyncEvent::JoinedRoom {
                room,
                peer_count,
                initial_sync,
            })
        }
        ServerMessage::PeerJoined { session_id } => Some(SyncEvent::PeerJoined { session_id }),
        ServerMessage::PeerLeft { session_id } => Some(SyncEvent::PeerLeft { session_id }),
        ServerMessage::Sync { from, data } => {
            decode_payload(&data).map(|data| SyncEvent::SyncReceived { from, data })
        }
        ServerMessage::Awareness { from, state } => {
            Some(SyncEvent::AwarenessReceived { from, state })
        }
        ServerMessage::Error { message } => Some(SyncEvent::Error { message }),
    }
}

mod client {
    use super::*;
    use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tungstenite::{connect, Message};
    use url::Url;

    /// Commands sent to the socket thread.
    enum WsCommand {
        Send(String),
        Close,
    }

    /// WebSocket client running on a background thread.
    ///
    /// The thread owns the socket; callers talk to it through channels and
    /// drain incoming events with [`SyncSocket::poll_events`], keeping the
    /// caller's event loop non-blocking.
    pub struct SyncSocket {
        state: ConnectionState,
        events: Vec<SyncEvent>,
        cmd_tx: Option<Sender<WsCommand>>,
        event_rx: Option<Receiver<SyncEvent>>,
        _thread: Option<JoinHandle<()>>,
    }

    impl SyncSocket {
        /// Create a disconnected client.
        pub fn new() -> Self {
            Self {
                state: ConnectionState::Disconnected,
                events: Vec::new(),
                cmd_tx: None,
                event_rx: None,
                _thread: None,
            }
        }

        /// Connect to a relay endpoint.
        pub fn connect(&mut self, url: &str) -> Result<(), SyncError> {
            if self.cmd_tx.is_some() {
                return Err(SyncError::AlreadyConnected);
            }

            let parsed = Url::parse(url)?;
            if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
                return Err(SyncError::UnsupportedScheme(parsed.scheme().to_string()));
            }

            self.state = ConnectionState::Connecting;

            let (cmd_tx, cmd_rx) = channel::<WsCommand>();
            let (event_tx, event_rx) = channel::<SyncEvent>();
            let url = url.to_string();

            let handle = thread::spawn(move || {
                log::info!("sync socket: connecting to {}", url);

                match connect(&url) {
                    Ok((mut socket, response)) => {
                        log::info!("sync socket connected, status: {}", response.status());
                        let _ = event_tx.send(SyncEvent::Connected);

                        // Short read timeout so the loop stays responsive to
                        // outgoing commands.
                        if let tungstenite::stream::MaybeTlsStream::Plain(tcp) = socket.get_mut() {
                            let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
                            let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
                        }

                        loop {
                            match cmd_rx.try_recv() {
                                Ok(WsCommand::Send(msg)) => {
                                    if let Err(e) = socket.send(Message::Text(msg)) {
                                        log::error!("sync socket send error: {}", e);
                                        break;
                                    }
                                }
                                Ok(WsCommand::Close) => {
                                    log::info!("sync socket close requested");
                                    let _ = socket.close(None);
                                    break;
                                }
                                Err(TryRecvError::Disconnected) => break,
                                Err(TryRecvError::Empty) => {}
                            }

                            match socket.read() {
                                Ok(Message::Text(txt)) => {
                                    match serde_json::from_str::<ServerMessage>(&txt) {
                                        Ok(msg) => {
                                            if let Some(event) = event_from_message(msg) {
                                                let _ = event_tx.send(event);
                                            }
                                        }
                                        Err(_) => {
                                            log::warn!("unparseable server frame: {}", txt);
                                        }
                                    }
                                }
                                Ok(Message::Ping(data)) => {
                                    let _ = socket.send(Message::Pong(data));
                                }
                                Ok(Message::Close(_)) => {
                                    log::info!("sync socket received close frame");
                                    break;
                                }
                                Ok(_) => {}
                                Err(tungstenite::Error::Io(ref e))
                                    if e.kind() == std::io::ErrorKind::WouldBlock
                                        || e.kind() == std::io::ErrorKind::TimedOut =>
                                {
                                    continue;
                                }
                                Err(e) => {
                                    log::error!("sync socket read error: {}", e);
                                    break;
                                }
                            }
                        }

                        let _ = event_tx.send(SyncEvent::Disconnected);
                    }
                    Err(e) => {
                        log::error!("sync socket connection failed: {}", e);
                        let _ = event_tx.send(SyncEvent::Error {
                            message: format!("connection failed: {}", e),
                        });
                    }
                }
            });

            self.cmd_tx = Some(cmd_tx);
            self.event_rx = Some(event_rx);
            self._thread = Some(handle);

            Ok(())
        }

        /// Close the connection and stop the socket thread.
        pub fn disconnect(&mut self) {
            if let Some(tx) = self.cmd_tx.take() {
                let _ = tx.send(WsCommand::Close);
            }
            self.event_rx = None;
            self._thread = None;
            self.state = ConnectionState::Disconnected;
        }

        /// Send a JSON frame.
        pub fn send(&self, msg: &str) -> Result<(), SyncError> {
            match &self.cmd_tx {
                Some(tx) => tx
                    .send(WsCommand::Send(msg.to_string()))
                    .map_err(|_| SyncError::ChannelClosed),
                None => Err(SyncError::NotConnected),
            }
        }

        /// Drain pending events, folding connection-state transitions.
        pub fn poll_events(&mut self) -> Vec<SyncEvent> {
            if let Some(rx) = &self.event_rx {
                while let Ok(event) = rx.try_recv() {
                    match &event {
                        SyncEvent::Connected => self.state = ConnectionState::Connected,
                        SyncEvent::Disconnected => self.state = ConnectionState::Disconnected,
                        SyncEvent::Error { .. } => self.state = ConnectionState::Error,
                        _ => {}
                    }
                    self.events.push(event);
                }
            }
            std::mem::take(&mut self.events)
        }

        /// Current connection state.
        pub fn state(&self) -> ConnectionState {
            self.state
        }

        /// Whether the socket is connected.
        pub fn is_connected(&self) -> bool {
            self.state == ConnectionState::Connected
        }
    }

    impl Default for SyncSocket {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for SyncSocket {
        fn drop(&mut self) {
            self.disconnect();
        }
    }
}

pub use client::SyncSocket;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip() {
        let data = b"replicated bytes";
        let encoded = encode_payload(data);
        let decoded = decode_payload(&encoded).unwrap();
        assert_eq!(data.to_vec(), decoded);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_payload("not!base64@@").is_none());
    }

    #[test]
    fn test_room_url() {
        assert_eq!(
            room_url("ws://localhost:3000", "default-room"),
            "ws://localhost:3000/sync/default-room"
        );
        assert_eq!(
            room_url("wss://canvas.example/", "team"),
            "wss://canvas.example/sync/team"
        );
    }

    #[test]
    fn test_client_message_serialize() {
        let msg = ClientMessage::Join {
            room: "test-room".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"join\""));
        assert!(json.contains("test-room"));
    }

    #[test]
    fn test_awareness_flattens_state() {
        let msg = ClientMessage::Awareness {
            session_id: Uuid::nil(),
            state: AwarenessState {
                nickname: Some("ada".to_string()),
                color: Some("#FFB6C1".to_string()),
                cursor: Some(Point::new(1.0, 2.0)),
                peer_ready: None,
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"nickname\":\"ada\""));
        assert!(json.contains("\"cursor\""));
        assert!(!json.contains("peer_ready"));
    }

    #[test]
    fn test_server_message_deserialize() {
        let json = r#"{"type":"joined","room":"test","peer_count":2}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        match msg {
            ServerMessage::Joined {
                room, peer_count, ..
            } => {
                assert_eq!(room, "test");
                assert_eq!(peer_count, 2);
            }
            _ => panic!("wrong message type"),
        }
    }

    #[test]
    fn test_sync_frame_with_bad_payload_is_dropped() {
        let msg = ServerMessage::Sync {
            from: Uuid::nil(),
            data: "@@@".to_string(),
        };
        assert!(event_from_message(msg).is_none());
    }

    #[test]
    fn test_connect_rejects_http_scheme() {
        let mut socket = SyncSocket::new();
        assert!(matches!(
            socket.connect("http://localhost:3000/sync/room"),
            Err(SyncError::UnsupportedScheme(_))
        ));
    }
}
