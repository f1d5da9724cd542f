//! Checkout endpoint.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use mks_store_core::OrderId;

use crate::error::AppError;
use crate::http::Envelope;
use crate::middleware::CurrentUser;
use crate::services::checkout::{CheckoutRequest, CheckoutService};
use crate::services::mercadopago::Charge;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/mercadopago", post(create_payment))
}

#[derive(Debug, Serialize)]
struct PaymentResponse {
    order_id: OrderId,
    payment: Charge,
}

async fn create_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<Envelope<PaymentResponse>>, AppError> {
    if body.frete.is_sign_negative() {
        return Err(AppError::Validation("Frete não pode ser negativo".to_string()));
    }

    let service = CheckoutService::new(
        state.pool(),
        state.gateway(),
        state.config().notification_url(),
    );

    let outcome = service.place_order(&user, body).await?;

    Ok(Envelope::success_with_message(
        PaymentResponse {
            order_id: outcome.order_id,
            payment: outcome.payment,
        },
        "Pagamento criado com sucesso",
    ))
}
