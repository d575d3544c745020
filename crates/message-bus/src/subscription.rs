//! # Subscription
//!
//! The receiving side of one topic.

use crate::bus::BusMessage;
use tokio::sync::mpsc;

/// A handle yielding every message delivered to one topic.
///
/// Each subscription owns its own queue. A subscriber that stops reading while
/// holding the handle makes publishers on its topic wait; dropping the handle
/// unsubscribes.
pub struct Subscription {
    receiver: mpsc::Receiver<BusMessage>,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::Receiver<BusMessage>) -> Self {
        Self { receiver }
    }

    /// Waits for the next message.
    ///
    /// Returns `None` once the transport is closed and everything already delivered
    /// has been read.
    pub async fn recv(&mut self) -> Option<BusMessage> {
        self.receiver.recv().await
    }
}
