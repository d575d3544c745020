//! `/orders` handlers.

use crate::api::{ApiError, AppState};
use crate::model::{Order, OrderCreate, OrderDetails, OrderId, OrderUpdate};
use crate::order_actor::OrderError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

/// A missing or unreadable order body is an invalid order.
fn order_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| OrderError::InvalidOrder(rejection.body_text()).into())
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderDetails>>, ApiError> {
    Ok(Json(state.orders.list_all().await?))
}

pub async fn get_order(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get_by_id(OrderId(id)).await?))
}

pub async fn get_order_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<OrderDetails>, ApiError> {
    Ok(Json(state.orders.get_details(OrderId(id)).await?))
}

pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<OrderCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.orders.create(order_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Result<Json<OrderUpdate>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.update(OrderId(id), order_body(body)?).await?))
}

pub async fn delete_order(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode, ApiError> {
    state.orders.delete(OrderId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
