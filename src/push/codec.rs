//! Engine.IO v4 / Socket.IO v5 text-frame codec.
//!
//! Each WebSocket text frame is one Engine.IO packet: a single type digit
//! followed by an optional payload. Engine.IO `message` packets carry a
//! Socket.IO packet:
//!
//! ```text
//! <type>[<namespace>,][<ack id>][<json data>]
//! 42["new-review",{"reviewId":"r1"}]     event on the default namespace
//! 42/admin,7["ping"]                     event on /admin with ack id 7
//! 40{"sid":"abc"}                        namespace connect acknowledgement
//! ```
//!
//! Binary packets (Socket.IO types 5/6) are rejected; nothing on this feed
//! carries attachments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default Socket.IO namespace
pub const DEFAULT_NAMESPACE: &str = "/";

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,
    #[error("unknown Engine.IO packet type '{0}'")]
    UnknownEnginePacket(char),
    #[error("unknown Socket.IO packet type '{0}'")]
    UnknownSocketPacket(char),
    #[error("binary Socket.IO packets are not supported")]
    BinaryUnsupported,
    #[error("ack id out of range")]
    BadAckId,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),
    #[error("event packet without a name")]
    MissingEventName,
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::InvalidJson(e.to_string())
    }
}

// =============================================================================
// Engine.IO
// =============================================================================

/// Handshake sent by the server in the `open` packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: u64,
}

/// One Engine.IO packet
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self, CodecError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(CodecError::Empty)?;
        let payload = chars.as_str();
        Ok(match kind {
            '0' => EnginePacket::Open(serde_json::from_str(payload)?),
            '1' => EnginePacket::Close,
            '2' => EnginePacket::Ping(payload.to_string()),
            '3' => EnginePacket::Pong(payload.to_string()),
            '4' => EnginePacket::Message(payload.to_string()),
            '5' => EnginePacket::Upgrade,
            '6' => EnginePacket::Noop,
            other => return Err(CodecError::UnknownEnginePacket(other)),
        })
    }

    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(handshake) => {
                // Serialising a plain struct of strings and integers cannot fail
                format!("0{}", serde_json::to_string(handshake).unwrap_or_default())
            }
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(payload) => format!("2{payload}"),
            EnginePacket::Pong(payload) => format!("3{payload}"),
            EnginePacket::Message(payload) => format!("4{payload}"),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

// =============================================================================
// Socket.IO
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketPacketKind {
    Connect,
    Disconnect,
    Event,
    Ack,
    ConnectError,
}

impl SocketPacketKind {
    fn digit(self) -> char {
        match self {
            SocketPacketKind::Connect => '0',
            SocketPacketKind::Disconnect => '1',
            SocketPacketKind::Event => '2',
            SocketPacketKind::Ack => '3',
            SocketPacketKind::ConnectError => '4',
        }
    }

    fn from_digit(c: char) -> Result<Self, CodecError> {
        match c {
            '0' => Ok(SocketPacketKind::Connect),
            '1' => Ok(SocketPacketKind::Disconnect),
            '2' => Ok(SocketPacketKind::Event),
            '3' => Ok(SocketPacketKind::Ack),
            '4' => Ok(SocketPacketKind::ConnectError),
            '5' | '6' => Err(CodecError::BinaryUnsupported),
            other => Err(CodecError::UnknownSocketPacket(other)),
        }
    }
}

/// One Socket.IO packet
#[derive(Debug, Clone, PartialEq)]
pub struct SocketPacket {
    pub kind: SocketPacketKind,
    pub namespace: String,
    pub ack_id: Option<u64>,
    pub data: Option<Value>,
}

impl SocketPacket {
    /// Namespace connect request for the default namespace
    pub fn connect() -> Self {
        Self {
            kind: SocketPacketKind::Connect,
            namespace: DEFAULT_NAMESPACE.to_string(),
            ack_id: None,
            data: None,
        }
    }

    /// Event with `name` and positional arguments
    pub fn event(name: &str, args: impl IntoIterator<Item = Value>) -> Self {
        let mut items = vec![Value::String(name.to_string())];
        items.extend(args);
        Self {
            kind: SocketPacketKind::Event,
            namespace: DEFAULT_NAMESPACE.to_string(),
            ack_id: None,
            data: Some(Value::Array(items)),
        }
    }

    pub fn decode(payload: &str) -> Result<Self, CodecError> {
        let mut chars = payload.chars();
        let kind = SocketPacketKind::from_digit(chars.next().ok_or(CodecError::Empty)?)?;
        let mut rest = chars.as_str();

        let mut namespace = DEFAULT_NAMESPACE.to_string();
        if rest.starts_with('/') {
            // A namespace runs up to the first ',' or to the end of the packet
            match rest.find(',') {
                Some(end) => {
                    namespace = rest[..end].to_string();
                    rest = &rest[end + 1..];
                }
                None => {
                    namespace = rest.to_string();
                    rest = "";
                }
            }
        }

        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let ack_id = if digits > 0 {
            let id = rest[..digits]
                .parse::<u64>()
                .map_err(|_| CodecError::BadAckId)?;
            rest = &rest[digits..];
            Some(id)
        } else {
            None
        };

        let data = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(rest)?)
        };

        Ok(Self {
            kind,
            namespace,
            ack_id,
            data,
        })
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(self.kind.digit());
        if self.namespace != DEFAULT_NAMESPACE {
            out.push_str(&self.namespace);
            out.push(',');
        }
        if let Some(id) = self.ack_id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = &self.data {
            out.push_str(&data.to_string());
        }
        out
    }

    /// Wrap in an Engine.IO message frame ready for the socket
    pub fn to_frame(&self) -> String {
        EnginePacket::Message(self.encode()).encode()
    }

    /// Split an event packet into its name and first argument
    pub fn event_parts(&self) -> Result<(&str, Option<&Value>), CodecError> {
        let items = self
            .data
            .as_ref()
            .and_then(Value::as_array)
            .ok_or(CodecError::MissingEventName)?;
        let name = items
            .first()
            .and_then(Value::as_str)
            .ok_or(CodecError::MissingEventName)?;
        Ok((name, items.get(1)))
    }

    /// Server-provided reason on a connect error
    pub fn error_message(&self) -> String {
        match &self.data {
            Some(Value::Object(obj)) => obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("connection refused")
                .to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => "connection refused".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_open_handshake() {
        let packet = EnginePacket::decode(
            r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .unwrap();
        match packet {
            EnginePacket::Open(h) => {
                assert_eq!(h.sid, "lv_VI97HAXpY6yYWAAAC");
                assert_eq!(h.ping_interval, 25000);
                assert_eq!(h.ping_timeout, 20000);
            }
            other => panic!("expected open, got {other:?}"),
        }
    }

    #[test]
    fn test_engine_control_packets() {
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(
            EnginePacket::decode("2heartbeat").unwrap(),
            EnginePacket::Ping("heartbeat".to_string())
        );
        assert_eq!(EnginePacket::decode("1").unwrap(), EnginePacket::Close);
        assert_eq!(EnginePacket::Pong(String::new()).encode(), "3");
        assert_eq!(EnginePacket::decode(""), Err(CodecError::Empty));
        assert_eq!(
            EnginePacket::decode("9x"),
            Err(CodecError::UnknownEnginePacket('9'))
        );
    }

    #[test]
    fn test_decode_event_on_default_namespace() {
        let EnginePacket::Message(payload) =
            EnginePacket::decode(r#"42["admin-notification-read",{"id":"n1"}]"#).unwrap()
        else {
            panic!("expected message");
        };
        let packet = SocketPacket::decode(&payload).unwrap();

        assert_eq!(packet.kind, SocketPacketKind::Event);
        assert_eq!(packet.namespace, "/");
        assert_eq!(packet.ack_id, None);
        let (name, arg) = packet.event_parts().unwrap();
        assert_eq!(name, "admin-notification-read");
        assert_eq!(arg, Some(&json!({"id": "n1"})));
    }

    #[test]
    fn test_decode_namespace_and_ack_id() {
        let packet = SocketPacket::decode(r#"2/admin,13["hello",1]"#).unwrap();
        assert_eq!(packet.namespace, "/admin");
        assert_eq!(packet.ack_id, Some(13));
        assert_eq!(packet.data, Some(json!(["hello", 1])));

        let packet = SocketPacket::decode("0/admin").unwrap();
        assert_eq!(packet.kind, SocketPacketKind::Connect);
        assert_eq!(packet.namespace, "/admin");
        assert_eq!(packet.data, None);
    }

    #[test]
    fn test_decode_connect_error() {
        let packet = SocketPacket::decode(r#"4{"message":"Not authorized"}"#).unwrap();
        assert_eq!(packet.kind, SocketPacketKind::ConnectError);
        assert_eq!(packet.error_message(), "Not authorized");
    }

    #[test]
    fn test_binary_packets_rejected() {
        assert_eq!(
            SocketPacket::decode(r#"51-["upload",{"_placeholder":true,"num":0}]"#),
            Err(CodecError::BinaryUnsupported)
        );
    }

    #[test]
    fn test_invalid_json_reported() {
        assert!(matches!(
            SocketPacket::decode(r#"2["broken""#),
            Err(CodecError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_encode_outbound_frames() {
        assert_eq!(SocketPacket::connect().to_frame(), "40");
        assert_eq!(
            SocketPacket::event("authenticate", [json!("tok-123")]).to_frame(),
            r#"42["authenticate","tok-123"]"#
        );
        assert_eq!(
            SocketPacket::event("join-admin-channel", []).to_frame(),
            r#"42["join-admin-channel"]"#
        );
    }

    #[test]
    fn test_event_without_name() {
        let packet = SocketPacket::decode(r#"2[42]"#).unwrap();
        assert_eq!(packet.event_parts(), Err(CodecError::MissingEventName));
    }
}
