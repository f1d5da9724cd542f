//! Payment gateway webhook endpoint.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::AppError;
use crate::http::Envelope;
use crate::services::webhook::{WebhookNotification, WebhookService};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/mercadopago", post(mercadopago))
}

/// Receive a payment status notification.
///
/// Returns 200 for everything the reconciler handled, including ignored
/// notifications. Gateway and database failures map to 5xx so the
/// gateway's retry policy redelivers.
async fn mercadopago(
    State(state): State<AppState>,
    Json(notification): Json<WebhookNotification>,
) -> Result<Json<Envelope<()>>, AppError> {
    WebhookService::new(state.pool(), state.gateway())
        .process(&notification)
        .await?;

    Ok(Envelope::message("Webhook processado"))
}
