//! # Publish/Subscribe Transport
//!
//! The [`MessageBus`] trait is what the services depend on; [`InMemoryBus`] is the
//! implementation wired into the process.

use crate::error::TransportError;
use crate::subscription::Subscription;
use crate::DEFAULT_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One message as seen by a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub payload: String,
}

/// Topic based publish/subscribe.
///
/// Delivery is at-least-once per subscriber: a message may arrive more than once, and
/// consumers must tolerate duplicates.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes `payload` to `topic`.
    ///
    /// Returns the number of subscribers the message was handed to. Zero subscribers
    /// is not an error; the message is simply lost.
    async fn publish(&self, topic: &str, payload: String) -> Result<usize, TransportError>;

    /// Subscribes to `topic`. Only messages published after this call are delivered.
    fn subscribe(&self, topic: &str) -> Subscription;
}

/// In-process bus: every subscription gets its own bounded queue.
///
/// Delivery is lossless. When a subscriber's queue is full, `publish` waits for it
/// to make room instead of dropping the message.
pub struct InMemoryBus {
    /// Also guards `closed`: the flag only changes under the write lock.
    topics: RwLock<HashMap<String, Vec<mpsc::Sender<BusMessage>>>>,
    capacity: usize,
    closed: AtomicBool,
    extra_deliveries: AtomicUsize,
    published: AtomicU64,
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` is the queue length of each subscription.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
            extra_deliveries: AtomicUsize::new(0),
            published: AtomicU64::new(0),
        }
    }

    /// Shuts the transport down.
    ///
    /// Further publishes fail with [`TransportError::Closed`] and every subscription
    /// ends once it has drained what was already delivered.
    pub fn close(&self) {
        let mut topics = self.topics.write().unwrap_or_else(|e| e.into_inner());
        self.closed.store(true, Ordering::SeqCst);
        topics.clear();
        warn!("Message bus closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Delivers every subsequent publish `1 + extra` times.
    pub fn set_duplicate_delivery(&self, extra: usize) {
        self.extra_deliveries.store(extra, Ordering::Relaxed);
    }

    /// Total successful publish calls.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Current number of subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(topic)
            .map_or(0, |senders| senders.iter().filter(|sender| !sender.is_closed()).count())
    }

    /// Snapshot of the live queues on `topic`, or `None` once closed.
    fn senders(&self, topic: &str) -> Option<Vec<mpsc::Sender<BusMessage>>> {
        let topics = self.topics.read().unwrap_or_else(|e| e.into_inner());
        if self.is_closed() {
            return None;
        }
        Some(topics.get(topic).cloned().unwrap_or_default())
    }

    fn prune(&self, topic: &str) {
        let mut topics = self.topics.write().unwrap_or_else(|e| e.into_inner());
        if let Some(senders) = topics.get_mut(topic) {
            senders.retain(|sender| !sender.is_closed());
            if senders.is_empty() {
                topics.remove(topic);
            }
        }
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, topic: &str, payload: String) -> Result<usize, TransportError> {
        let Some(senders) = self.senders(topic) else {
            warn!(topic, "Publish on closed transport");
            return Err(TransportError::Closed {
                topic: topic.to_string(),
            });
        };

        let message = BusMessage {
            topic: topic.to_string(),
            payload,
        };
        let copies = 1 + self.extra_deliveries.load(Ordering::Relaxed);
        let mut receivers = 0;
        let mut gone = false;
        for sender in &senders {
            let mut delivered = true;
            for _ in 0..copies {
                // Err only means this subscription was dropped.
                if sender.send(message.clone()).await.is_err() {
                    delivered = false;
                    break;
                }
            }
            if delivered {
                receivers += 1;
            } else {
                gone = true;
            }
        }
        if gone {
            self.prune(topic);
        }
        self.published.fetch_add(1, Ordering::Relaxed);

        if receivers == 0 {
            debug!(topic, "Published with no subscribers");
        } else {
            debug!(topic, receivers, copies, "Published");
        }
        Ok(receivers)
    }

    fn subscribe(&self, topic: &str) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let mut topics = self.topics.write().unwrap_or_else(|e| e.into_inner());
        if self.is_closed() {
            // The sender is dropped right away, so the subscription ends immediately.
            debug!(topic, "Subscribed to closed transport");
        } else {
            topics.entry(topic.to_string()).or_default().push(sender);
            debug!(topic, "Subscribed");
        }
        Subscription::new(receiver)
    }
}
