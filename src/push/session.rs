//! Transport-independent Socket.IO client state machine.
//!
//! Feed it raw text frames; it answers with the frames to send back and the
//! typed events to deliver. The WebSocket glue only shuttles strings.

use super::codec::{CodecError, EnginePacket, SocketPacket, SocketPacketKind};
use super::events::{PushCommand, PushEvent};

/// Result of handling one inbound frame
#[derive(Debug, Default, PartialEq)]
pub struct Step {
    /// Frames to write to the socket, in order
    pub replies: Vec<String>,
    /// Events to hand to the application, in order
    pub events: Vec<PushEvent>,
}

#[derive(Debug)]
pub struct PushSession {
    token: Option<String>,
    connected: bool,
}

impl PushSession {
    /// `token` is sent with `authenticate` once the namespace connects.
    /// Without a token the channel connects but never joins the admin group.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn on_frame(&mut self, frame: &str) -> Result<Step, CodecError> {
        let mut step = Step::default();
        match EnginePacket::decode(frame)? {
            EnginePacket::Open(handshake) => {
                tracing::debug!(
                    "push: engine open sid={} ping={}ms",
                    handshake.sid,
                    handshake.ping_interval
                );
                step.replies.push(SocketPacket::connect().to_frame());
            }
            EnginePacket::Ping(payload) => {
                step.replies.push(EnginePacket::Pong(payload).encode());
            }
            EnginePacket::Close => {
                if std::mem::take(&mut self.connected) {
                    step.events.push(PushEvent::Disconnected);
                }
            }
            EnginePacket::Message(payload) => {
                let packet = SocketPacket::decode(&payload)?;
                self.on_packet(packet, &mut step)?;
            }
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
        }
        Ok(step)
    }

    fn on_packet(&mut self, packet: SocketPacket, step: &mut Step) -> Result<(), CodecError> {
        match packet.kind {
            SocketPacketKind::Connect => {
                self.connected = true;
                step.events.push(PushEvent::Connected);
                if let Some(token) = &self.token {
                    for command in [
                        PushCommand::Authenticate(token.clone()),
                        PushCommand::JoinAdminChannel,
                    ] {
                        step.replies.push(command.to_packet().to_frame());
                    }
                    tracing::debug!("push: authenticated and joined admin channel");
                }
            }
            SocketPacketKind::ConnectError => {
                self.connected = false;
                step.events
                    .push(PushEvent::ConnectError(packet.error_message()));
            }
            SocketPacketKind::Disconnect => {
                if std::mem::take(&mut self.connected) {
                    step.events.push(PushEvent::Disconnected);
                }
            }
            SocketPacketKind::Event => {
                step.events.push(PushEvent::from_packet(&packet)?);
            }
            SocketPacketKind::Ack => {}
        }
        Ok(())
    }
}
