//! # ActorEntity Trait
//!
//! The contract a stored type (Order, Product, ...) implements so the generic
//! [`ResourceActor`](crate::ResourceActor) can own it. Associated types pin the id,
//! the creation payload, the update payload and the error, so an order payload can
//! never be sent to the product store.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! Both default to `Ok(())`. Only [`ActorEntity::on_update`] must be written by hand,
//! because only the entity knows which of its fields an update replaces.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Built from the actor's `u64` counter; ordering defines the store's list order.
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug + From<u64>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// The error type for this entity.
    ///
    /// One enum per entity rather than one per operation: clients match on a single
    /// type, at the cost of some variants being impossible for some operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the assigned id and the payload.
    /// Called synchronously before `on_create`; returning an error rejects the create.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction, before the entity becomes visible.
    async fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received. The entity mutates itself in place.
    async fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed.
    async fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
