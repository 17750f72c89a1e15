//! Push channel (Socket.IO over WebSocket).
//!
//! - [`codec`]: Engine.IO / Socket.IO text frames
//! - [`events`]: typed inbound/outbound events
//! - [`session`]: protocol state machine (handshake, ping/pong, auth)
//! - `socket` (WASM only): browser WebSocket connection with reconnects

pub mod codec;
pub mod events;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod socket;

pub use codec::{CodecError, EnginePacket, SocketPacket, SocketPacketKind};
pub use events::{PushCommand, PushEvent, ReadReceipt};
pub use session::{PushSession, Step};

#[cfg(target_arch = "wasm32")]
pub use socket::PushConnection;

use std::time::Duration;

/// Reconnection after an unexpected close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), or `None` once
    /// the budget is spent
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        (attempt >= 1 && attempt <= self.max_attempts).then_some(self.delay)
    }
}
