//! Entity trait implementation for the Order domain type.
//!
//! See the trait implementation on [`Order`] for method documentation.

use crate::model::{Order, OrderCreate, OrderId, OrderUpdate};
use crate::order_actor::OrderError;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Error = OrderError;

    /// Creates a new Order from creation parameters.
    ///
    /// Rejects an order without items.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.items.is_empty() {
            return Err(OrderError::InvalidOrder("an order needs at least one item".into()));
        }
        Ok(Self {
            id,
            order_date: params.order_date.unwrap_or_else(Utc::now),
            order_status: params.order_status.unwrap_or_default(),
            items: params.items,
        })
    }

    /// Replaces date, status and items.
    async fn on_update(&mut self, update: OrderUpdate) -> Result<(), Self::Error> {
        self.order_date = update.order_date;
        self.order_status = update.order_status;
        self.items = update.items;
        Ok(())
    }
}
