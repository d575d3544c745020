//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).
//!
//! Each wrapper turns framework errors into its service's error type and adds the
//! calls whose payload needs mapping. `get`, `list` and `delete` come from
//! [`ActorClient`](actor_framework::ActorClient).

pub mod order_client;
pub mod product_client;

pub use order_client::*;
pub use product_client::*;
