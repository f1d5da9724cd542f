//! Cart repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use mks_store_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::CartItem;
use crate::models::product::Product;

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantidade: i32,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for CartItem {
    fn from(r: CartRow) -> Self {
        Self {
            id: CartItemId::new(r.id),
            user_id: UserId::new(r.user_id),
            product_id: ProductId::new(r.product_id),
            quantidade: r.quantidade,
            created_at: r.created_at,
        }
    }
}

/// Joined cart line + product row, for the cart view and checkout.
#[derive(sqlx::FromRow)]
struct CartProductRow {
    item_id: i32,
    user_id: i32,
    quantidade: i32,
    item_created_at: DateTime<Utc>,
    product_id: i32,
    nome: String,
    descricao: Option<String>,
    preco: Decimal,
    imagens: Json<Vec<String>>,
    categoria: String,
    promocao: bool,
    preco_promocional: Option<Decimal>,
    estoque: i32,
    is_active: bool,
    product_created_at: DateTime<Utc>,
}

impl From<CartProductRow> for (CartItem, Product) {
    fn from(r: CartProductRow) -> Self {
        (
            CartItem {
                id: CartItemId::new(r.item_id),
                user_id: UserId::new(r.user_id),
                product_id: ProductId::new(r.product_id),
                quantidade: r.quantidade,
                created_at: r.item_created_at,
            },
            Product {
                id: ProductId::new(r.product_id),
                nome: r.nome,
                descricao: r.descricao,
                preco: r.preco,
                imagens: r.imagens.0,
                categoria: r.categoria,
                promocao: r.promocao,
                preco_promocional: r.preco_promocional,
                estoque: r.estoque,
                is_active: r.is_active,
                created_at: r.product_created_at,
            },
        )
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart lines joined with their live products.
    ///
    /// Inactive products are included; callers decide whether to skip them
    /// (cart view) or fail on them (checkout).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_products(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(CartItem, Product)>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartProductRow>(
            "SELECT ci.id AS item_id, ci.user_id, ci.quantidade,
                    ci.created_at AS item_created_at,
                    p.id AS product_id, p.nome, p.descricao, p.preco, p.imagens,
                    p.categoria, p.promocao, p.preco_promocional, p.estoque,
                    p.is_active, p.created_at AS product_created_at
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.user_id = $1
             ORDER BY ci.created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a product to the cart, incrementing the existing line if present.
    ///
    /// The (user, product) unique constraint makes this a single upsert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantidade: i32,
    ) -> Result<CartItem, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "INSERT INTO cart_items (user_id, product_id, quantidade)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET quantidade = cart_items.quantidade + EXCLUDED.quantidade
             RETURNING id, user_id, product_id, quantidade, created_at",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantidade)
        .fetch_one(self.pool)
        .await?;

        Ok(CartItem::from(row))
    }

    /// Set a cart line's quantity; a quantity of zero or less deletes it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantidade: i32,
    ) -> Result<(), RepositoryError> {
        let result = if quantidade <= 0 {
            sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
                .bind(item_id)
                .bind(user_id)
                .execute(self.pool)
                .await?
        } else {
            sqlx::query(
                "UPDATE cart_items SET quantidade = $3 WHERE id = $1 AND user_id = $2",
            )
            .bind(item_id)
            .bind(user_id)
            .bind(quantidade)
            .execute(self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete all of a user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
