//! Order history endpoints. All require an authenticated user.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use mks_store_core::OrderId;

use crate::db::orders::OrderRepository;
use crate::error::AppError;
use crate::http::Envelope;
use crate::middleware::CurrentUser;
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(get_one))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Envelope<Vec<Order>>>, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Envelope::success(orders))
}

/// Get one of the current user's orders.
///
/// Another user's order is indistinguishable from a missing one.
async fn get_one(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Envelope<Order>>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .filter(|o| o.user_id == user.id)
        .ok_or_else(|| AppError::NotFound("Pedido não encontrado".to_string()))?;

    Ok(Envelope::success(order))
}
