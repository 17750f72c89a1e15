//! Typed push-channel events.
//!
//! Socket.IO delivers events as `[name, payload]`; these map the names the
//! admin feed listens to onto one tagged union.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::codec::{CodecError, SocketPacket};
use crate::notifications::{FeedAction, Notification, RecordId, ReviewSubmitted};

pub const EVENT_NEW_REVIEW: &str = "new-review";
pub const EVENT_ADMIN_NOTIFICATION: &str = "admin-notification";
pub const EVENT_ADMIN_NOTIFICATION_READ: &str = "admin-notification-read";
pub const EVENT_ADMIN_NOTIFICATIONS_READ_ALL: &str = "admin-notifications-read-all";

pub const EMIT_AUTHENTICATE: &str = "authenticate";
pub const EMIT_JOIN_ADMIN_CHANNEL: &str = "join-admin-channel";

/// Payload of `admin-notification-read`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadReceipt {
    pub id: RecordId,
}

/// Inbound events from the push channel
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Namespace connection acknowledged
    Connected,
    /// Server refused the namespace connection
    ConnectError(String),
    /// Transport or namespace closed
    Disconnected,
    NewReview(ReviewSubmitted),
    AdminNotification(Box<Notification>),
    AdminNotificationRead(ReadReceipt),
    AdminNotificationsReadAll,
    /// An event this client does not handle
    Unhandled(String),
}

impl PushEvent {
    /// Decode a named event and its first argument
    pub fn from_event(name: &str, payload: Option<&Value>) -> Result<Self, CodecError> {
        let payload = payload.cloned().unwrap_or(Value::Null);
        Ok(match name {
            EVENT_NEW_REVIEW => PushEvent::NewReview(serde_json::from_value(payload)?),
            EVENT_ADMIN_NOTIFICATION => {
                PushEvent::AdminNotification(Box::new(serde_json::from_value(payload)?))
            }
            EVENT_ADMIN_NOTIFICATION_READ => {
                PushEvent::AdminNotificationRead(serde_json::from_value(payload)?)
            }
            EVENT_ADMIN_NOTIFICATIONS_READ_ALL => PushEvent::AdminNotificationsReadAll,
            other => PushEvent::Unhandled(other.to_string()),
        })
    }

    /// Decode an event packet
    pub fn from_packet(packet: &SocketPacket) -> Result<Self, CodecError> {
        let (name, payload) = packet.event_parts()?;
        Self::from_event(name, payload)
    }

    /// Feed change carried by this event, if any
    pub fn into_feed_action(self, now: DateTime<Utc>) -> Option<FeedAction> {
        match self {
            PushEvent::NewReview(review) => Some(FeedAction::Received(Notification::from_review(
                review, now,
            ))),
            PushEvent::AdminNotification(n) => Some(FeedAction::Received(*n)),
            PushEvent::AdminNotificationRead(receipt) => Some(FeedAction::MarkedRead(receipt.id)),
            PushEvent::AdminNotificationsReadAll => Some(FeedAction::MarkedAllRead),
            PushEvent::Connected
            | PushEvent::ConnectError(_)
            | PushEvent::Disconnected
            | PushEvent::Unhandled(_) => None,
        }
    }
}

/// Outbound events emitted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushCommand {
    Authenticate(String),
    JoinAdminChannel,
}

impl PushCommand {
    pub fn to_packet(&self) -> SocketPacket {
        match self {
            PushCommand::Authenticate(token) => {
                SocketPacket::event(EMIT_AUTHENTICATE, [Value::String(token.clone())])
            }
            PushCommand::JoinAdminChannel => SocketPacket::event(EMIT_JOIN_ADMIN_CHANNEL, []),
        }
    }
}
