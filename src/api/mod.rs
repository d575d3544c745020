//! # HTTP API
//!
//! Thin axum layer over the order service and the product client. Handlers only
//! translate: path and body in, service call, JSON or [`ApiError`] out.
//!
//! | Route                     | Methods            |
//! |---------------------------|--------------------|
//! | `/health`                 | GET                |
//! | `/orders`                 | GET, POST          |
//! | `/orders/:id`             | GET, PUT, DELETE   |
//! | `/orders/:id/details`     | GET                |
//! | `/products`               | GET, POST          |
//! | `/products/:id`           | GET, PUT, DELETE   |

pub mod error;
pub mod orders;
pub mod products;

pub use error::ApiError;

use crate::bridge::{BridgeStats, LookupBridge};
use crate::clients::ProductClient;
use crate::service::OrderService;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub products: ProductClient,
    pub bridge: LookupBridge,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub bridge: BridgeStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        bridge: state.bridge.stats(),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/orders/:id/details", get(orders::get_order_details))
        .route("/products", get(products::list_products).post(products::create_product))
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
