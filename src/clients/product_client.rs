//! # Product Client
//!
//! Provides a high-level API for interacting with the `Product` actor. This is the
//! whole product service surface: the HTTP handlers and the details responder both
//! go through it.
use crate::model::{Product, ProductFields, ProductId};
use crate::product_actor::ProductError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ProductError::Store(e.to_string())
    }
}

impl ProductClient {
    #[instrument(skip(self, fields))]
    pub async fn create_product(&self, fields: ProductFields) -> Result<Product, ProductError> {
        debug!(?fields, "create_product called");
        self.inner.create(fields).await.map_err(Self::map_error)
    }

    /// Like [`ActorClient::get`], but absence is an error.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ProductError> {
        match self.get(id).await? {
            Some(product) => Ok(product),
            None => {
                warn!(%id, "Product not found");
                Err(ProductError::NotFound(id))
            }
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.list().await
    }

    /// Replaces every client-supplied field of the product.
    #[instrument(skip(self, fields))]
    pub async fn update_product(&self, id: ProductId, fields: ProductFields) -> Result<Product, ProductError> {
        debug!(?fields, "update_product called");
        self.inner.update(id, fields).await.map_err(|e| {
            if e.is_not_found() {
                ProductError::NotFound(id)
            } else {
                Self::map_error(e)
            }
        })
    }

    /// Deleting an absent product succeeds.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ProductError> {
        self.delete(id).await
    }
}
