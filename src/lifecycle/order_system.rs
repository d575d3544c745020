use crate::api::AppState;
use crate::bridge::LookupBridge;
use crate::clients::{OrderClient, ProductClient};
use crate::config::AppConfig;
use crate::responder::ProductResponder;
use crate::service::OrderService;
use message_bus::InMemoryBus;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime orchestrator: owns the bus, the two stores and the listeners between them.
///
/// # Architecture
///
/// - **Product actor**: product store, answered over the bus by the [`ProductResponder`]
/// - **Order actor**: order store, read by the [`OrderService`]
/// - **Lookup bridge**: the order side's only path to product data
///
/// The order side never holds a `ProductClient`; product details reach it only as
/// reply messages on the bus.
///
/// ```ignore
/// let system = OrderSystem::start(&AppConfig::default());
/// let product = system.product_client.create_product(fields).await?;
/// let order = system.order_service.create(OrderCreate::new(items)).await?;
/// let details = system.order_service.get_details(order.id).await?;
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub order_service: OrderService,
    pub product_client: ProductClient,
    pub bridge: LookupBridge,
    /// Exposed so callers can inject transport faults.
    pub bus: Arc<InMemoryBus>,

    /// Actor and listener tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns every actor and listener. Must be called inside a Tokio runtime.
    ///
    /// Both listeners subscribe before this returns, so a request published right
    /// after `start` is never missed.
    pub fn start(config: &AppConfig) -> Self {
        let bus = Arc::new(InMemoryBus::with_capacity(config.bus_capacity));

        let (product_actor, product_inner) = crate::product_actor::new(config.actor_buffer);
        let (order_actor, order_inner) = crate::order_actor::new(config.actor_buffer);
        let product_handle = tokio::spawn(product_actor.run());
        let order_handle = tokio::spawn(order_actor.run());

        let product_client = ProductClient::new(product_inner);
        let responder = ProductResponder::new(
            product_client.clone(),
            bus.clone(),
            config.request_topic.clone(),
            config.reply_topic.clone(),
        );
        let responder_handle = responder.listen();

        let bridge = LookupBridge::new(bus.clone(), config.bridge_settings());
        let bridge_handle = bridge.listen();

        let order_service = OrderService::new(
            OrderClient::new(order_inner),
            Arc::new(bridge.clone()),
            config.enrichment_policy,
        )
        .with_lookup_concurrency(config.lookup_concurrency);

        info!(
            request_topic = %config.request_topic,
            reply_topic = %config.reply_topic,
            timeout_ms = config.lookup_timeout.as_millis() as u64,
            policy = ?config.enrichment_policy,
            "System started"
        );

        Self {
            order_service,
            product_client,
            bridge,
            bus,
            handles: vec![product_handle, order_handle, responder_handle, bridge_handle],
        }
    }

    /// Shared state for the HTTP layer.
    pub fn app_state(&self) -> AppState {
        AppState {
            orders: self.order_service.clone(),
            products: self.product_client.clone(),
            bridge: self.bridge.clone(),
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Closing the bus ends both listeners, which drops the responder's product client.
    /// Dropping the remaining clients then lets each actor drain its queue and exit.
    /// Any `AppState` handed out must be dropped first or the actors keep running.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!(in_flight = self.bridge.in_flight(), "Shutting down system...");

        self.bus.close();
        drop(self.order_service);
        drop(self.product_client);
        drop(self.bridge);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Task failed");
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Enrichment, OrderCreate, OrderItem, ProductFields, ProductId};

    #[tokio::test]
    async fn test_start_enrich_and_shutdown() {
        let system = OrderSystem::start(&AppConfig::default());

        let product = system
            .product_client
            .create_product(ProductFields::new("Widget", 9.99))
            .await
            .unwrap();
        let order = system
            .order_service
            .create(OrderCreate::new(vec![OrderItem {
                product_id: product.id,
                quantity: 2,
                price: 9.99,
            }]))
            .await
            .unwrap();

        let details = system.order_service.get_details(order.id).await.unwrap();
        assert_eq!(details.products.len(), 1);
        assert_eq!(details.products[0].product_id, ProductId(1));
        assert!(matches!(details.products[0].enrichment, Enrichment::Found { .. }));
        assert_eq!(system.bridge.in_flight(), 0);

        system.shutdown().await.unwrap();
    }
}
