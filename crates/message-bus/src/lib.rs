//! # Message Bus
//!
//! A one-way publish/subscribe transport with named topics. Every subscriber of a topic
//! receives every message published to it after it subscribed. There is no reply
//! channel and no ordering guarantee across topics; request/reply protocols are layered
//! on top by the services themselves.
//!
//! [`InMemoryBus`] is the in-process implementation, one `tokio::sync::mpsc` queue per
//! subscription. Nothing is dropped: a full queue makes the publisher wait.
//! It can be switched into failure modes (see [`InMemoryBus::close`] and
//! [`InMemoryBus::set_duplicate_delivery`]) to exercise the callers' error paths.
//!
//! ```rust
//! use message_bus::{InMemoryBus, MessageBus};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bus = InMemoryBus::new();
//!     let mut subscription = bus.subscribe("greetings");
//!
//!     let receivers = bus.publish("greetings", "hello".to_string()).await.unwrap();
//!     assert_eq!(receivers, 1);
//!
//!     let message = subscription.recv().await.unwrap();
//!     assert_eq!(message.payload, "hello");
//! }
//! ```

pub mod bus;
pub mod error;
pub mod subscription;

pub use bus::{BusMessage, InMemoryBus, MessageBus};
pub use error::TransportError;
pub use subscription::Subscription;

/// Queue length of each subscription on the in-memory bus. Publishers wait while a
/// subscriber's queue is full.
pub const DEFAULT_CAPACITY: usize = 256;
