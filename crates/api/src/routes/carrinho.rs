//! Shopping cart endpoints. All require an authenticated user.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use mks_store_core::{CartItemId, ProductId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::AppError;
use crate::http::Envelope;
use crate::middleware::CurrentUser;
use crate::services::cart::{CartView, build_cart_view};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view))
        .route("/adicionar", post(add))
        .route("/item/{id}", put(set_quantity).delete(remove))
        .route("/limpar", delete(clear))
}

#[derive(Debug, Deserialize)]
struct AddRequest {
    produto_id: ProductId,
    #[serde(default = "default_quantity")]
    quantidade: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// `quantidade` travels as a query parameter on PUT, not in the body.
#[derive(Debug, Deserialize)]
struct QuantityQuery {
    quantidade: i32,
}

async fn view(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Envelope<CartView>>, AppError> {
    let lines = CartRepository::new(state.pool())
        .list_with_products(user.id)
        .await?;

    Ok(Envelope::success(build_cart_view(lines)))
}

async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<AddRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if body.quantidade <= 0 {
        return Err(AppError::Validation(
            "Quantidade deve ser maior que zero".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .get_active(body.produto_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado".to_string()))?;

    if product.estoque < body.quantidade {
        return Err(AppError::Validation(format!(
            "Estoque insuficiente para {}",
            product.nome
        )));
    }

    CartRepository::new(state.pool())
        .add(user.id, body.produto_id, body.quantidade)
        .await?;

    Ok(Envelope::message("Produto adicionado ao carrinho"))
}

async fn set_quantity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<CartItemId>,
    Query(query): Query<QuantityQuery>,
) -> Result<Json<Envelope<()>>, AppError> {
    CartRepository::new(state.pool())
        .set_quantity(user.id, id, query.quantidade)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Item não encontrado no carrinho".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Envelope::message("Carrinho atualizado"))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<CartItemId>,
) -> Result<Json<Envelope<()>>, AppError> {
    CartRepository::new(state.pool())
        .remove(user.id, id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Item não encontrado no carrinho".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Envelope::message("Item removido do carrinho"))
}

async fn clear(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Envelope<()>>, AppError> {
    CartRepository::new(state.pool()).clear(user.id).await?;

    Ok(Envelope::message("Carrinho esvaziado"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_field_names() {
        let body: AddRequest =
            serde_json::from_value(serde_json::json!({ "produto_id": 3, "quantidade": 2 }))
                .expect("deserialize");
        assert_eq!(body.produto_id, ProductId::new(3));
        assert_eq!(body.quantidade, 2);
    }

    #[test]
    fn test_add_request_quantity_defaults_to_one() {
        let body: AddRequest =
            serde_json::from_value(serde_json::json!({ "produto_id": 3 })).expect("deserialize");
        assert_eq!(body.quantidade, 1);
    }

    #[test]
    fn test_quantity_comes_from_query_string() {
        let query: QuantityQuery =
            serde_urlencoded::from_str("quantidade=4").expect("deserialize");
        assert_eq!(query.quantidade, 4);
    }
}
