//! # Order Query Service
//!
//! Order CRUD plus enrichment: reading an order can attach the details of every
//! product it references, fetched through the lookup bridge rather than by calling the
//! product service directly.

use crate::bridge::{DetailsLookup, LookupReply};
use crate::clients::OrderClient;
use crate::config::EnrichmentPolicy;
use crate::model::{Enrichment, Order, OrderCreate, OrderDetails, OrderId, OrderUpdate, ProductDetails};
use crate::order_actor::OrderError;
use actor_framework::ActorClient;
use futures::future::join_all;
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

/// Lookups one service (and all its clones) keeps in flight at most.
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 16;

#[derive(Clone)]
pub struct OrderService {
    orders: OrderClient,
    lookup: Arc<dyn DetailsLookup>,
    policy: EnrichmentPolicy,
    concurrency: usize,
    /// Shared by clones, so concurrent HTTP reads share one budget.
    lookup_permits: Arc<Semaphore>,
}

impl OrderService {
    pub fn new(orders: OrderClient, lookup: Arc<dyn DetailsLookup>, policy: EnrichmentPolicy) -> Self {
        Self {
            orders,
            lookup,
            policy,
            concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            lookup_permits: Arc::new(Semaphore::new(DEFAULT_LOOKUP_CONCURRENCY)),
        }
    }

    /// Caps the number of lookups in flight. Zero is treated as one.
    #[must_use]
    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        let limit = limit.max(1);
        self.concurrency = limit;
        self.lookup_permits = Arc::new(Semaphore::new(limit));
        self
    }

    /// Every order in store order, each enriched with its products' details.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<OrderDetails>, OrderError> {
        let orders = self.orders.list().await?;
        debug!(count = orders.len(), "Enriching orders");
        stream::iter(orders)
            .map(|order| self.enrich(order))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get(id).await?.ok_or(OrderError::NotFound(id))
    }

    /// One order with its products' details.
    #[instrument(skip(self))]
    pub async fn get_details(&self, id: OrderId) -> Result<OrderDetails, OrderError> {
        let order = self.get_by_id(id).await?;
        self.enrich(order).await
    }

    /// Stores a new order. An order without items is rejected before it reaches the store.
    #[instrument(skip(self, order))]
    pub async fn create(&self, order: OrderCreate) -> Result<Order, OrderError> {
        if order.items.is_empty() {
            warn!("Rejected order without items");
            return Err(OrderError::InvalidOrder("an order needs at least one item".into()));
        }
        let created = self.orders.create_order(order).await?;
        info!(order_id = %created.id, items = created.items.len(), "Order created");
        Ok(created)
    }

    /// Replaces date, status and items of the order `id`.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        let updated = self.orders.update_order(id, update).await?;
        info!(order_id = %id, "Order updated");
        Ok(updated)
    }

    /// Removes the order. Removing an absent order is not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), OrderError> {
        self.orders.delete(id).await
    }

    /// One lookup per distinct product id, concurrently within the service's budget.
    async fn enrich(&self, order: Order) -> Result<OrderDetails, OrderError> {
        let product_ids = order.product_ids();
        let lookups = product_ids.iter().map(|product_id| {
            let subject_id = product_id.to_string();
            let lookup = &self.lookup;
            let permits = &self.lookup_permits;
            async move {
                // The semaphore is never closed; the permit is held until the reply.
                let _permit = permits.acquire().await;
                lookup.request_details(&subject_id).await
            }
        });
        let replies = join_all(lookups).await;

        let mut products = Vec::with_capacity(product_ids.len());
        for (product_id, reply) in product_ids.into_iter().zip(replies) {
            let enrichment = match reply {
                Ok(LookupReply::Found(payload)) => Enrichment::Found { payload },
                Ok(LookupReply::Missing) => Enrichment::Missing,
                Err(e) => match self.policy {
                    EnrichmentPolicy::Fail => return Err(e.into()),
                    EnrichmentPolicy::Degrade => {
                        warn!(order_id = %order.id, %product_id, error = %e, "Enrichment degraded");
                        Enrichment::Failed { error: e.to_string() }
                    }
                },
            };
            products.push(ProductDetails {
                product_id,
                enrichment,
            });
        }

        Ok(OrderDetails { order, products })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeError, CorrelationId};
    use crate::model::{OrderItem, OrderStatus, ProductId};
    use actor_framework::mock::MockClient;
    use actor_framework::FrameworkError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone)]
    enum Scripted {
        Found(&'static str),
        Missing,
        Timeout,
    }

    /// Answers lookups from a fixed table and records every subject asked for.
    #[derive(Default)]
    struct ScriptedLookup {
        answers: HashMap<String, Scripted>,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedLookup {
        fn with(answers: &[(&str, Scripted)]) -> Arc<Self> {
            Arc::new(Self {
                answers: answers
                    .iter()
                    .map(|(subject, answer)| (subject.to_string(), answer.clone()))
                    .collect(),
                asked: Mutex::new(Vec::new()),
            })
        }

        fn asked(&self) -> Vec<String> {
            let mut asked = self.asked.lock().unwrap().clone();
            asked.sort();
            asked
        }
    }

    #[async_trait]
    impl DetailsLookup for ScriptedLookup {
        async fn request_details(&self, subject_id: &str) -> Result<LookupReply, BridgeError> {
            self.asked.lock().unwrap().push(subject_id.to_string());
            match self.answers.get(subject_id) {
                Some(Scripted::Found(payload)) => Ok(LookupReply::Found(payload.to_string())),
                Some(Scripted::Missing) | None => Ok(LookupReply::Missing),
                Some(Scripted::Timeout) => Err(BridgeError::LookupTimeout {
                    correlation_id: CorrelationId::new(),
                    subject_id: subject_id.to_string(),
                    elapsed: Duration::from_millis(10),
                }),
            }
        }
    }

    /// Answers every lookup as found after a short pause, tracking peak concurrency.
    #[derive(Default)]
    struct CountingLookup {
        current: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DetailsLookup for CountingLookup {
        async fn request_details(&self, subject_id: &str) -> Result<LookupReply, BridgeError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(LookupReply::Found(format!("{{\"id\":{subject_id}}}")))
        }
    }

    fn item(product_id: u64) -> OrderItem {
        OrderItem {
            product_id: ProductId(product_id),
            quantity: 1,
            price: 2.5,
        }
    }

    fn order(id: u64, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId(id),
            order_date: Utc::now(),
            order_status: OrderStatus::Created,
            items,
        }
    }

    fn service(mock: &MockClient<Order>, lookup: Arc<ScriptedLookup>, policy: EnrichmentPolicy) -> OrderService {
        OrderService::new(OrderClient::new(mock.client()), lookup, policy)
    }

    #[tokio::test]
    async fn test_create_without_items_never_reaches_store() {
        let mock = MockClient::<Order>::new();
        let service = service(&mock, ScriptedLookup::with(&[]), EnrichmentPolicy::Degrade);

        let result = service.create(OrderCreate::new(vec![])).await;

        assert!(matches!(result, Err(OrderError::InvalidOrder(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_create_returns_stored_order() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create().return_ok(order(1, vec![item(1)]));
        let service = service(&mock, ScriptedLookup::with(&[]), EnrichmentPolicy::Degrade);

        let created = service.create(OrderCreate::new(vec![item(1)])).await.unwrap();

        assert_eq!(created.id, OrderId(1));
        assert_eq!(created.items, vec![item(1)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_get_by_id_absent_is_not_found() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId(3)).return_ok(None);
        let service = service(&mock, ScriptedLookup::with(&[]), EnrichmentPolicy::Degrade);

        let result = service.get_by_id(OrderId(3)).await;

        assert!(matches!(result, Err(OrderError::NotFound(OrderId(3)))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_addresses_given_id() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_update(OrderId(2)).return_ok(order(2, vec![item(4)]));
        let service = service(&mock, ScriptedLookup::with(&[]), EnrichmentPolicy::Degrade);

        let update = OrderUpdate {
            order_date: Utc::now(),
            order_status: OrderStatus::Paid,
            items: vec![item(4)],
        };
        let updated = service.update(OrderId(2), update).await.unwrap();

        assert_eq!(updated.id, OrderId(2));
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_absent_is_not_found() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_update(OrderId(8))
            .return_err(FrameworkError::NotFound("8".into()));
        let service = service(&mock, ScriptedLookup::with(&[]), EnrichmentPolicy::Degrade);

        let update = OrderUpdate {
            order_date: Utc::now(),
            order_status: OrderStatus::Paid,
            items: vec![item(1)],
        };
        let result = service.update(OrderId(8), update).await;

        assert!(matches!(result, Err(OrderError::NotFound(OrderId(8)))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_delete_absent_succeeds() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_delete(OrderId(5)).return_ok(false);
        let service = service(&mock, ScriptedLookup::with(&[]), EnrichmentPolicy::Degrade);

        assert!(service.delete(OrderId(5)).await.is_ok());
        mock.verify();
    }

    #[tokio::test]
    async fn test_list_all_enriches_each_distinct_product_once() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_list().return_ok(vec![
            order(1, vec![item(1), item(2), item(1)]),
            order(2, vec![item(3)]),
        ]);
        let lookup = ScriptedLookup::with(&[("1", Scripted::Found("{\"id\":1}")), ("2", Scripted::Missing)]);
        let service = service(&mock, lookup.clone(), EnrichmentPolicy::Degrade);

        let details = service.list_all().await.unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].order.id, OrderId(1));
        assert_eq!(details[1].order.id, OrderId(2));
        assert_eq!(
            details[0].products,
            vec![
                ProductDetails {
                    product_id: ProductId(1),
                    enrichment: Enrichment::Found {
                        payload: "{\"id\":1}".into()
                    },
                },
                ProductDetails {
                    product_id: ProductId(2),
                    enrichment: Enrichment::Missing,
                },
            ]
        );
        assert_eq!(lookup.asked(), vec!["1", "2", "3"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_degrade_records_lookup_failure() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId(1))
            .return_ok(Some(order(1, vec![item(1), item(2)])));
        let lookup = ScriptedLookup::with(&[("1", Scripted::Timeout), ("2", Scripted::Found("{}"))]);
        let service = service(&mock, lookup, EnrichmentPolicy::Degrade);

        let details = service.get_details(OrderId(1)).await.unwrap();

        assert!(matches!(details.products[0].enrichment, Enrichment::Failed { .. }));
        assert_eq!(
            details.products[1].enrichment,
            Enrichment::Found { payload: "{}".into() }
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_fail_policy_propagates_lookup_error() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_list().return_ok(vec![order(1, vec![item(1)])]);
        let lookup = ScriptedLookup::with(&[("1", Scripted::Timeout)]);
        let service = service(&mock, lookup, EnrichmentPolicy::Fail);

        let result = service.list_all().await;

        assert!(matches!(
            result,
            Err(OrderError::Lookup(BridgeError::LookupTimeout { .. }))
        ));
        mock.verify();
    }

    #[tokio::test]
    async fn test_get_details_absent_skips_lookup() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId(4)).return_ok(None);
        let lookup = ScriptedLookup::with(&[]);
        let service = service(&mock, lookup.clone(), EnrichmentPolicy::Degrade);

        let result = service.get_details(OrderId(4)).await;

        assert!(matches!(result, Err(OrderError::NotFound(OrderId(4)))));
        assert!(lookup.asked().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn test_lookups_stay_within_concurrency_limit() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_list()
            .return_ok((1..=20).map(|id| order(id, vec![item(id), item(id + 100)])).collect());
        let lookup = Arc::new(CountingLookup::default());
        let service = OrderService::new(OrderClient::new(mock.client()), lookup.clone(), EnrichmentPolicy::Fail)
            .with_lookup_concurrency(3);

        let details = service.list_all().await.unwrap();

        assert_eq!(details.len(), 20);
        for (n, entry) in details.iter().enumerate() {
            assert_eq!(entry.order.id, OrderId(n as u64 + 1));
            assert!(entry
                .products
                .iter()
                .all(|product| matches!(product.enrichment, Enrichment::Found { .. })));
        }
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 40);
        assert!(lookup.peak.load(Ordering::SeqCst) <= 3);
        mock.verify();
    }
}
