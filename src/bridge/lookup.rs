//! # Lookup Bridge
//!
//! Turns "publish a request, some day a reply shows up on another topic" into one
//! awaitable call with a deadline.

use crate::bridge::pending::PendingGuard;
use crate::bridge::{
    BridgeError, BridgeStats, CorrelationId, DetailsLookup, DetailsReply, DetailsRequest, LookupReply,
    PendingTable, ReplyDisposition,
};
use async_trait::async_trait;
use message_bus::MessageBus;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn, Span};

pub const DEFAULT_REQUEST_TOPIC: &str = "product-details-request";
pub const DEFAULT_REPLY_TOPIC: &str = "product-details-response";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    pub request_topic: String,
    pub reply_topic: String,
    /// How long one call waits for its reply.
    pub timeout: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            request_topic: DEFAULT_REQUEST_TOPIC.to_string(),
            reply_topic: DEFAULT_REPLY_TOPIC.to_string(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

struct BridgeInner {
    bus: Arc<dyn MessageBus>,
    pending: PendingTable,
    settings: BridgeSettings,
}

/// Cloneable handle to the bridge. Clones share one in-flight table.
///
/// Replies are only seen once [`LookupBridge::listen`] has been called.
#[derive(Clone)]
pub struct LookupBridge {
    inner: Arc<BridgeInner>,
}

impl LookupBridge {
    pub fn new(bus: Arc<dyn MessageBus>, settings: BridgeSettings) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                bus,
                pending: PendingTable::new(),
                settings,
            }),
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.inner.settings
    }

    /// Publishes a details request for `subject_id` and waits for its reply.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::PublishFailure`] right away when the transport refuses the request
    /// - [`BridgeError::LookupTimeout`] when no reply arrives within the configured timeout
    ///
    /// In every case, including the returned future being dropped, the call leaves no
    /// entry behind in the in-flight table.
    #[instrument(skip(self), fields(correlation_id = tracing::field::Empty))]
    pub async fn request_details(&self, subject_id: &str) -> Result<LookupReply, BridgeError> {
        let inner = &self.inner;
        let correlation_id = CorrelationId::new();
        Span::current().record("correlation_id", tracing::field::display(correlation_id));

        let request = DetailsRequest::new(subject_id, correlation_id).to_json()?;

        // Registered before publishing, so even an immediate reply finds its entry.
        let mut reply = inner.pending.register(correlation_id, subject_id);
        let _guard = PendingGuard::new(&inner.pending, correlation_id);

        if let Err(source) = inner.bus.publish(&inner.settings.request_topic, request).await {
            inner.pending.withdraw(&correlation_id);
            error!(%correlation_id, subject_id, error = %source, "Details request not published");
            return Err(BridgeError::PublishFailure {
                correlation_id,
                source,
            });
        }
        debug!(subject_id, "Details requested");

        match tokio::time::timeout(inner.settings.timeout, &mut reply).await {
            Ok(Ok(answer)) => Ok(answer),
            Ok(Err(_)) => Err(BridgeError::Closed { correlation_id }),
            Err(_) => match inner.pending.expire(&correlation_id) {
                Some(elapsed) => {
                    warn!(
                        %correlation_id,
                        subject_id,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Details lookup timed out"
                    );
                    Err(BridgeError::LookupTimeout {
                        correlation_id,
                        subject_id: subject_id.to_string(),
                        elapsed,
                    })
                }
                // A reply won the race against the deadline and is already in the slot.
                None => reply.try_recv().map_err(|_| BridgeError::Closed { correlation_id }),
            },
        }
    }

    /// Handles one raw message from the reply topic.
    ///
    /// Never fails: undecodable and unmatched replies are logged and dropped.
    pub fn on_details_available(&self, raw: &str) -> ReplyDisposition {
        let reply = match DetailsReply::from_json(raw) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Malformed details reply discarded");
                return ReplyDisposition::Malformed;
            }
        };

        let answer = match (reply.found, reply.payload) {
            (true, Some(payload)) => LookupReply::Found(payload),
            (false, _) => LookupReply::Missing,
            (true, None) => {
                warn!(correlation_id = %reply.correlation_id, "Found reply without payload discarded");
                return ReplyDisposition::Malformed;
            }
        };

        self.inner.pending.fulfill(&reply.correlation_id, answer)
    }

    /// Starts the reply listener.
    ///
    /// The subscription exists when this returns, so no reply to a later request can
    /// be missed. The task ends when the transport closes.
    pub fn listen(&self) -> JoinHandle<()> {
        let topic = self.inner.settings.reply_topic.clone();
        let mut subscription = self.inner.bus.subscribe(&topic);
        let bridge = self.clone();

        tokio::spawn(async move {
            info!(%topic, "Reply listener started");
            while let Some(message) = subscription.recv().await {
                bridge.on_details_available(&message.payload);
            }
            info!(%topic, stats = ?bridge.stats(), "Reply listener stopped");
        })
    }

    pub fn in_flight(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn stats(&self) -> BridgeStats {
        self.inner.pending.stats()
    }
}

#[async_trait]
impl DetailsLookup for LookupBridge {
    async fn request_details(&self, subject_id: &str) -> Result<LookupReply, BridgeError> {
        LookupBridge::request_details(self, subject_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_bus::InMemoryBus;

    fn settings(timeout_ms: u64) -> BridgeSettings {
        BridgeSettings {
            timeout: Duration::from_millis(timeout_ms),
            ..BridgeSettings::default()
        }
    }

    fn bridge(bus: &Arc<InMemoryBus>, timeout_ms: u64) -> LookupBridge {
        let bridge = LookupBridge::new(bus.clone(), settings(timeout_ms));
        bridge.listen();
        bridge
    }

    /// Answers every request with "details of <subject>".
    fn spawn_responder(bus: Arc<InMemoryBus>) -> JoinHandle<()> {
        let mut requests = bus.subscribe(DEFAULT_REQUEST_TOPIC);
        tokio::spawn(async move {
            while let Some(message) = requests.recv().await {
                let request = DetailsRequest::from_json(&message.payload).unwrap();
                let reply = DetailsReply::found(
                    request.correlation_id,
                    format!("details of {}", request.subject_id),
                );
                bus.publish(DEFAULT_REPLY_TOPIC, reply.to_json().unwrap())
                    .await
                    .unwrap();
            }
        })
    }

    #[tokio::test]
    async fn test_reply_before_timeout_returns_its_payload() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 1_000);
        spawn_responder(bus.clone());

        let reply = bridge.request_details("1").await.unwrap();

        assert_eq!(reply, LookupReply::Found("details of 1".into()));
        assert_eq!(bridge.in_flight(), 0);
        assert_eq!(bridge.stats().fulfilled, 1);
    }

    #[tokio::test]
    async fn test_one_request_published_per_call() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 1_000);
        let mut requests = bus.subscribe(DEFAULT_REQUEST_TOPIC);

        let call = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.request_details("7").await }
        });

        let message = requests.recv().await.unwrap();
        let request = DetailsRequest::from_json(&message.payload).unwrap();
        assert_eq!(request.subject_id, "7");
        assert_eq!(bridge.in_flight(), 1);

        bridge.on_details_available(&DetailsReply::not_found(request.correlation_id).to_json().unwrap());
        assert_eq!(call.await.unwrap().unwrap(), LookupReply::Missing);
        assert_eq!(bus.published(), 1);
    }

    #[tokio::test]
    async fn test_no_reply_times_out_without_leftover_entry() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 50);

        let result = bridge.request_details("1").await;

        match result {
            Err(BridgeError::LookupTimeout {
                subject_id, elapsed, ..
            }) => {
                assert_eq!(subject_id, "1");
                assert!(elapsed >= Duration::from_millis(50));
            }
            other => panic!("Expected LookupTimeout, got {other:?}"),
        }
        assert_eq!(bridge.in_flight(), 0);
        assert_eq!(bridge.stats().timed_out, 1);
    }

    #[tokio::test]
    async fn test_late_reply_after_timeout_is_discarded() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 30);
        let mut requests = bus.subscribe(DEFAULT_REQUEST_TOPIC);

        assert!(bridge.request_details("1").await.is_err());

        let request = DetailsRequest::from_json(&requests.recv().await.unwrap().payload).unwrap();
        let late = DetailsReply::found(request.correlation_id, "late".into());
        assert_eq!(
            bridge.on_details_available(&late.to_json().unwrap()),
            ReplyDisposition::Stale
        );
        assert_eq!(bridge.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_swapped_replies_reach_their_own_callers() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 1_000);
        let mut requests = bus.subscribe(DEFAULT_REQUEST_TOPIC);

        // Collect both requests, then answer in reverse order.
        let replier = tokio::spawn({
            let bus = bus.clone();
            async move {
                let first = DetailsRequest::from_json(&requests.recv().await.unwrap().payload).unwrap();
                let second = DetailsRequest::from_json(&requests.recv().await.unwrap().payload).unwrap();
                for request in [second, first] {
                    let reply = DetailsReply::found(request.correlation_id, format!("for {}", request.subject_id));
                    bus.publish(DEFAULT_REPLY_TOPIC, reply.to_json().unwrap())
                        .await
                        .unwrap();
                }
            }
        });

        let (a, b) = tokio::join!(bridge.request_details("A"), bridge.request_details("B"));
        replier.await.unwrap();

        assert_eq!(a.unwrap(), LookupReply::Found("for A".into()));
        assert_eq!(b.unwrap(), LookupReply::Found("for B".into()));
        assert_eq!(bridge.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_replies_do_not_disturb_waiting_call() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 1_000);
        let mut requests = bus.subscribe(DEFAULT_REQUEST_TOPIC);

        let call = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.request_details("1").await }
        });
        let request = DetailsRequest::from_json(&requests.recv().await.unwrap().payload).unwrap();

        let unknown = DetailsReply::found(CorrelationId::new(), "someone else".into());
        assert_eq!(
            bridge.on_details_available(&unknown.to_json().unwrap()),
            ReplyDisposition::Stale
        );
        assert_eq!(bridge.on_details_available("not json"), ReplyDisposition::Malformed);
        assert_eq!(bridge.in_flight(), 1);

        let own = DetailsReply::found(request.correlation_id, "mine".into());
        assert_eq!(
            bridge.on_details_available(&own.to_json().unwrap()),
            ReplyDisposition::Delivered
        );
        assert_eq!(call.await.unwrap().unwrap(), LookupReply::Found("mine".into()));
    }

    #[tokio::test]
    async fn test_found_without_payload_is_malformed() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 1_000);

        let raw = format!(r#"{{"correlationId":"{}","found":true,"payload":null}}"#, CorrelationId::new());
        assert_eq!(bridge.on_details_available(&raw), ReplyDisposition::Malformed);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_resolves_once() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 1_000);
        spawn_responder(bus.clone());
        bus.set_duplicate_delivery(1);

        let reply = bridge.request_details("3").await.unwrap();
        assert_eq!(reply, LookupReply::Found("details of 3".into()));

        // The responder saw the request twice and answered twice; wait for the echo.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let stats = bridge.stats();
        assert_eq!(stats.fulfilled, 1);
        assert!(stats.stale >= 1);
        assert_eq!(stats.in_flight, 0);
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_no_entry() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 1_000);
        bus.close();

        let result = bridge.request_details("1").await;

        assert!(matches!(result, Err(BridgeError::PublishFailure { .. })));
        let stats = bridge.stats();
        assert_eq!(stats.in_flight, 0);
        assert_eq!(stats.registered, 0);
        assert_eq!(stats.cancelled, 0);
    }

    #[tokio::test]
    async fn test_abandoned_call_removes_its_entry() {
        let bus = Arc::new(InMemoryBus::new());
        let bridge = bridge(&bus, 10_000);
        let mut requests = bus.subscribe(DEFAULT_REQUEST_TOPIC);

        let call = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.request_details("1").await }
        });
        requests.recv().await.unwrap();
        assert_eq!(bridge.in_flight(), 1);

        call.abort();
        assert!(call.await.unwrap_err().is_cancelled());

        assert_eq!(bridge.in_flight(), 0);
        assert_eq!(bridge.stats().cancelled, 1);
    }
}
