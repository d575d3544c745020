//! Read-only projections built on demand when an order is enriched.

use crate::model::{Order, ProductId};
use serde::Serialize;

/// An order paired with the product details obtained for it.
///
/// `products` holds one entry per distinct product id of the order's items, in order
/// of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order: Order,
    pub products: Vec<ProductDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub enrichment: Enrichment,
}

/// Outcome of one product lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Enrichment {
    /// The raw JSON returned by the product service, unchanged.
    Found { payload: String },
    /// The product service answered that no such product exists.
    Missing,
    /// No usable answer; only recorded when enrichment degrades instead of failing.
    Failed { error: String },
}
