//! The host frame seam.

use crossbeam_channel::{Receiver, Sender};
use geolab_client::{FrameMessage, SessionBus, SessionEvent};
use serde_json::Value;

/// The page embedding the form, if any.
pub trait HostFrame: Send + Sync {
    /// Whether the form runs inside a host.
    fn is_embedded(&self) -> bool;

    /// Posts a message to the host. No-op when not embedded.
    fn post(&self, message: FrameMessage);
}

/// Not embedded; messages go nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standalone;

impl HostFrame for Standalone {
    fn is_embedded(&self) -> bool {
        false
    }

    fn post(&self, message: FrameMessage) {
        tracing::trace!(?message, "not embedded, dropping host message");
    }
}

/// Embedded; messages are delivered over a channel to the host side.
#[derive(Debug, Clone)]
pub struct ChannelFrame {
    sender: Sender<FrameMessage>,
}

impl ChannelFrame {
    /// Creates a frame and the host's receiving end.
    pub fn channel() -> (Self, Receiver<FrameMessage>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl HostFrame for ChannelFrame {
    fn is_embedded(&self) -> bool {
        true
    }

    fn post(&self, message: FrameMessage) {
        tracing::debug!(?message, "posting message to host");
        if self.sender.send(message).is_err() {
            tracing::warn!("host frame disconnected");
        }
    }
}

/// Feeds a raw message from the host into the session bus.
///
/// Returns whether the message was recognized.
pub fn receive_host_message(bus: &SessionBus, raw: &Value) -> bool {
    match FrameMessage::parse(raw) {
        Some(message) => {
            bus.publish(SessionEvent::Host(message));
            true
        }
        None => false,
    }
}
