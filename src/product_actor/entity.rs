//! Entity trait implementation for the Product domain type.

use crate::model::{Product, ProductFields, ProductId};
use crate::product_actor::ProductError;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductFields;
    type Update = ProductFields;
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductFields) -> Result<Self, Self::Error> {
        Ok(Self::new(id, params, Utc::now()))
    }

    /// Full replacement of the client-supplied fields.
    async fn on_update(&mut self, update: ProductFields) -> Result<(), Self::Error> {
        self.replace(update, Utc::now());
        Ok(())
    }
}
