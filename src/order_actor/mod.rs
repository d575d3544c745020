//! # Order Actor
//!
//! The store half of the order service: a [`ResourceActor`] owning every [`Order`].
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`], the error type of every order operation
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use order_enrichment::clients::OrderClient;
//! use order_enrichment::model::{OrderCreate, OrderItem, ProductId};
//! use order_enrichment::order_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = order_actor::new(32);
//!     let client = OrderClient::new(generic_client);
//!     tokio::spawn(actor.run());
//!
//!     let item = OrderItem { product_id: ProductId(1), quantity: 2, price: 9.99 };
//!     let order = client.create_order(OrderCreate::new(vec![item])).await?;
//!     assert_eq!(order.id.0, 1);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
