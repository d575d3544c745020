//! # Order Enrichment
//!
//! Two services that never call each other directly. The order side owns orders, the
//! product side owns the catalog, and the only link between them is a pair of
//! pub/sub topics. Reading an order "with details" means asking the product side over
//! the bus and waiting for the matching answer.
//!
//! ## Design
//!
//! ### Stores are actors
//! Orders and products each live in a generic `ResourceActor<T>` from the
//! `actor-framework` crate. One task owns each map and answers requests in arrival
//! order, so single-entity operations need no locks. Domain clients
//! ([`clients::OrderClient`], [`clients::ProductClient`]) wrap the raw channel and map
//! framework errors onto each entity's own error enum.
//!
//! ### Request/reply over fire-and-forget messaging
//! The [`bridge`] module is the heart of the crate. [`LookupBridge::request_details`]
//! tags each request with a fresh [`CorrelationId`], registers it in the
//! [`PendingTable`] *before* publishing, then waits on a oneshot channel with a
//! deadline. A single listener routes replies by correlation id; replies that match
//! nothing (late, duplicate, foreign) are dropped with a debug log.
//!
//! ### Failure is a value
//! A lookup that times out or cannot be published is a [`BridgeError`]. The
//! [`service::OrderService`] either degrades (marks that product entry as failed and
//! still returns the order) or fails the whole read, per
//! [`config::EnrichmentPolicy`].
//!
//! ## Module Tour
//!
//! - [`model`]: orders, products and the enriched read model
//! - [`order_actor`], [`product_actor`]: `ActorEntity` implementations
//! - [`clients`]: typed wrappers over the actor channels
//! - [`bridge`]: correlation ids, wire messages, pending table, the bridge itself
//! - [`responder`]: product-side listener answering detail requests
//! - [`service`]: order use-cases and enrichment
//! - [`api`]: axum routes
//! - [`config`], [`lifecycle`]: environment configuration, wiring and shutdown
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! curl -X POST localhost:8080/products -H 'content-type: application/json' \
//!      -d '{"name":"Widget","price":9.99}'
//! curl -X POST localhost:8080/orders -H 'content-type: application/json' \
//!      -d '{"items":[{"productId":1,"quantity":2,"price":9.99}]}'
//! curl localhost:8080/orders/1/details
//! ```
//!
//! [`LookupBridge::request_details`]: bridge::LookupBridge::request_details
//! [`CorrelationId`]: bridge::CorrelationId
//! [`PendingTable`]: bridge::PendingTable
//! [`BridgeError`]: bridge::BridgeError

pub mod api;
pub mod bridge;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod responder;
pub mod service;
