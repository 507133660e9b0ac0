//! WebSocket message types: envelope, commands, and room events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a response to the command with id `id`.
    #[must_use]
    pub fn response(id: String, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Response,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error reply carrying a numeric `code`.
    #[must_use]
    pub fn error(id: String, code: u32, message: impl Into<String>) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "code": code,
                "message": message.into(),
            }),
        }
    }

    /// Wraps a room event for delivery to the client.
    #[must_use]
    pub fn event(event: &RoomEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: Utc::now(),
            payload: serde_json::to_value(event).unwrap_or_default(),
        }
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client room event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Join this connection to a domain under a member id.
    Join {
        /// Domain name.
        domain: String,
        /// Member id to be addressable as.
        member_id: String,
    },
    /// Leave every room of a domain.
    Leave {
        /// Domain name.
        domain: String,
    },
}

impl WsCommand {
    /// Names accepted in the `command` field.
    pub const NAMES: &'static [&'static str] = &["join", "leave"];
}

/// An event emitted to a room, as queued for one connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomEvent {
    /// Rendered room key (`domain:member`).
    pub room: String,
    /// Event name.
    pub event: String,
    /// Event payload.
    pub data: serde_json::Value,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn command_envelope_parses_without_timestamp() {
        let raw = r#"{"id":"1","type":"command","payload":{"command":"join","domain":"lobby","member_id":"u1"}}"#;
        let Ok(msg) = serde_json::from_str::<WsMessage>(raw) else {
            panic!("envelope should parse");
        };
        assert_eq!(msg.msg_type, WsMessageType::Command);
        let Ok(WsCommand::Join { domain, member_id }) = serde_json::from_value(msg.payload) else {
            panic!("join command expected");
        };
        assert_eq!(domain, "lobby");
        assert_eq!(member_id, "u1");
    }

    #[test]
    fn event_wraps_room_event() {
        let event = RoomEvent {
            room: "lobby:u1".to_string(),
            event: "ping".to_string(),
            data: serde_json::json!({"n": 2}),
        };
        let msg = WsMessage::event(&event);
        assert_eq!(msg.msg_type, WsMessageType::Event);
        assert_eq!(msg.payload["room"], "lobby:u1");
        assert_eq!(msg.payload["data"]["n"], 2);
    }

    #[test]
    fn error_carries_code() {
        let msg = WsMessage::error("7".to_string(), 404, "unknown command");
        let json = serde_json::to_string(&msg).unwrap_or_default();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("404"));
    }
}
