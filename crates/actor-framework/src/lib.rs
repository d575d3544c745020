//! # Actor Framework
//!
//! Building blocks for type-safe, single-owner entity stores. Each entity type (Order,
//! Product) is owned by one [`ResourceActor`] task; everything else talks to it through
//! a cloneable [`ResourceClient`] over a channel.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - the stored type and its create/update rules
//! 2. **Runtime Layer** ([`ResourceActor`]) - sequential message processing
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests and
//!    domain error mapping
//!
//! Because an actor handles one request at a time, every single-entity operation is
//! atomic with respect to the others, and no lock guards the map.
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Product {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[derive(Debug)] struct ProductCreate { name: String }
//! #[derive(Debug)] struct ProductUpdate { name: Option<String> }
//! #[derive(Debug, thiserror::Error)] #[error("product error")] struct ProductError;
//!
//! #[async_trait]
//! impl ActorEntity for Product {
//!     type Id = u64;
//!     type Create = ProductCreate;
//!     type Update = ProductUpdate;
//!     type Error = ProductError;
//!
//!     fn from_create_params(id: u64, params: ProductCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, name: params.name })
//!     }
//!
//!     async fn on_update(&mut self, update: ProductUpdate) -> Result<(), Self::Error> {
//!         if let Some(name) = update.name { self.name = name; }
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Product>::new(10);
//!     tokio::spawn(actor.run());
//!
//!     let product = client.create(ProductCreate { name: "Widget".into() }).await.unwrap();
//!     let fetched = client.get(product.id).await.unwrap().unwrap();
//!     assert_eq!(fetched.name, "Widget");
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor
//! - Different actors run in parallel
//!
//! ## Testing
//!
//! [`mock::MockClient`] hands out a real `ResourceClient<T>` answered from scripted
//! expectations, so services can be tested without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
