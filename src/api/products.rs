//! `/products` handlers.

use crate::api::{ApiError, AppState};
use crate::model::{Product, ProductFields, ProductId};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

fn product_body(body: Result<Json<ProductFields>, JsonRejection>) -> Result<ProductFields, ApiError> {
    body.map(|Json(fields)| fields)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.list_products().await?))
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.get_product(ProductId(id)).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create_product(product_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Result<Json<ProductFields>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(
        state
            .products
            .update_product(ProductId(id), product_body(body)?)
            .await?,
    ))
}

pub async fn delete_product(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode, ApiError> {
    state.products.delete_product(ProductId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
