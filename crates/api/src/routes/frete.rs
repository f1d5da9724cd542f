//! CEP lookup and shipping quote endpoints.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::cart::CartRepository;
use crate::error::AppError;
use crate::http::Envelope;
use crate::middleware::CurrentUser;
use crate::services::shipping;
use crate::services::viacep::CepAddress;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cep/{cep}", get(lookup_cep))
        .route("/frete/calcular", post(calculate))
}

async fn lookup_cep(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<Envelope<CepAddress>>, AppError> {
    let address = state
        .viacep()
        .get_address(&cep)
        .await
        .ok_or_else(|| AppError::NotFound("CEP não encontrado".to_string()))?;

    Ok(Envelope::success(address))
}

#[derive(Debug, Deserialize)]
struct CalculateRequest {
    cep: String,
}

#[derive(Debug, Serialize)]
struct ShippingResponse {
    frete: Decimal,
    prazo: u32,
    subtotal: Decimal,
    frete_gratis: bool,
}

/// Quote shipping for the user's current cart.
///
/// The destination state comes from a live CEP lookup; an unresolvable
/// CEP falls back to the default rate rather than failing the quote.
async fn calculate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CalculateRequest>,
) -> Result<Json<Envelope<ShippingResponse>>, AppError> {
    let lines = CartRepository::new(state.pool())
        .list_with_products(user.id)
        .await?;

    let view = crate::services::cart::build_cart_view(lines);
    if view.items.is_empty() {
        return Err(AppError::Validation("Carrinho vazio".to_string()));
    }

    // The free-shipping threshold doesn't depend on the destination, so
    // the lookup is skipped when the total already qualifies.
    let quote = if shipping::qualifies_for_free_shipping(view.total) {
        shipping::quote(None, view.total)
    } else {
        let uf = state
            .viacep()
            .get_address(&body.cep)
            .await
            .map(|a| a.uf);
        shipping::quote(uf.as_deref(), view.total)
    };

    Ok(Envelope::success(ShippingResponse {
        frete_gratis: quote.frete == Decimal::ZERO,
        frete: quote.frete,
        prazo: quote.prazo,
        subtotal: view.total,
    }))
}
