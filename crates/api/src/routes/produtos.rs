//! Product catalog endpoints.
//!
//! Reads are public; writes require the admin role.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use mks_store_core::ProductId;

use crate::db::products::{ProductFilter, ProductRepository};
use crate::error::AppError;
use crate::http::Envelope;
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, Product, ProductUpdate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ListQuery {
    categoria: Option<String>,
    search: Option<String>,
    promocao: Option<bool>,
    skip: i64,
    limit: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            categoria: None,
            search: None,
            promocao: None,
            skip: 0,
            limit: 50,
        }
    }
}

impl From<ListQuery> for ProductFilter {
    fn from(q: ListQuery) -> Self {
        Self {
            categoria: q.categoria,
            search: q.search,
            promocao: q.promocao,
            skip: q.skip,
            limit: q.limit,
        }
    }
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Product>>>, AppError> {
    let products = ProductRepository::new(state.pool())
        .list(&query.into())
        .await?;

    Ok(Envelope::success(products))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Envelope<Product>>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado".to_string()))?;

    Ok(Envelope::success(product))
}

async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<NewProduct>,
) -> Result<Json<Envelope<Product>>, AppError> {
    validate_new_product(&body)?;

    let product = ProductRepository::new(state.pool()).create(&body).await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok(Envelope::success_with_message(
        product,
        "Produto criado com sucesso",
    ))
}

async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<Envelope<Product>>, AppError> {
    if let Some(preco) = body.preco
        && preco.is_sign_negative()
    {
        return Err(AppError::Validation("Preço não pode ser negativo".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .update(id, &body)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Produto não encontrado".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Envelope::success_with_message(
        product,
        "Produto atualizado com sucesso",
    ))
}

async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Envelope<()>>, AppError> {
    ProductRepository::new(state.pool())
        .soft_delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Produto não encontrado".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Envelope::message("Produto removido com sucesso"))
}

fn validate_new_product(new: &NewProduct) -> Result<(), AppError> {
    if new.nome.trim().is_empty() {
        return Err(AppError::Validation("Nome é obrigatório".to_string()));
    }
    if new.preco.is_sign_negative() {
        return Err(AppError::Validation("Preço não pode ser negativo".to_string()));
    }
    if new.estoque < 0 {
        return Err(AppError::Validation("Estoque não pode ser negativo".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_product() -> NewProduct {
        NewProduct {
            nome: "Vestido".to_string(),
            descricao: None,
            preco: dec!(99.90),
            imagens: vec![],
            categoria: "Feminina".to_string(),
            promocao: false,
            preco_promocional: None,
            estoque: 5,
        }
    }

    #[test]
    fn test_validate_new_product_ok() {
        assert!(validate_new_product(&new_product()).is_ok());
    }

    #[test]
    fn test_validate_new_product_blank_name() {
        let mut p = new_product();
        p.nome = "  ".to_string();
        assert!(validate_new_product(&p).is_err());
    }

    #[test]
    fn test_validate_new_product_negative_price() {
        let mut p = new_product();
        p.preco = dec!(-1.00);
        assert!(validate_new_product(&p).is_err());
    }

    #[test]
    fn test_validate_new_product_negative_stock() {
        let mut p = new_product();
        p.estoque = -1;
        assert!(validate_new_product(&p).is_err());
    }
}
