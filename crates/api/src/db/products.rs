//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use mks_store_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductUpdate};

const PRODUCT_COLUMNS: &str = "id, nome, descricao, preco, imagens, categoria, promocao, \
                               preco_promocional, estoque, is_active, created_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    nome: String,
    descricao: Option<String>,
    preco: Decimal,
    imagens: Json<Vec<String>>,
    categoria: String,
    promocao: bool,
    preco_promocional: Option<Decimal>,
    estoque: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: ProductId::new(r.id),
            nome: r.nome,
            descricao: r.descricao,
            preco: r.preco,
            imagens: r.imagens.0,
            categoria: r.categoria,
            promocao: r.promocao,
            preco_promocional: r.preco_promocional,
            estoque: r.estoque,
            is_active: r.is_active,
            created_at: r.created_at,
        }
    }
}

/// Catalog listing filters.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub categoria: Option<String>,
    /// Case-insensitive substring match over nome and descricao.
    pub search: Option<String>,
    pub promocao: Option<bool>,
    pub skip: i64,
    pub limit: i64,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products matching the filter, paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active"
        ));

        if let Some(categoria) = &filter.categoria {
            qb.push(" AND categoria = ");
            qb.push_bind(categoria);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (nome ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR descricao ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        if let Some(promocao) = filter.promocao {
            qb.push(" AND promocao = ");
            qb.push_bind(promocao);
        }

        qb.push(" ORDER BY id OFFSET ");
        qb.push_bind(filter.skip.max(0));
        qb.push(" LIMIT ");
        qb.push_bind(filter.limit.clamp(1, 100));

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get one active product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Get a product regardless of its active flag (admin operations).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Create a new catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products
                 (nome, descricao, preco, imagens, categoria, promocao, preco_promocional, estoque)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.nome)
        .bind(new.descricao.as_deref())
        .bind(new.preco)
        .bind(Json(&new.imagens))
        .bind(&new.categoria)
        .bind(new.promocao)
        .bind(new.preco_promocional)
        .bind(new.estoque)
        .fetch_one(self.pool)
        .await?;

        Ok(Product::from(row))
    }

    /// Apply a partial update. `None` fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET nome = COALESCE($2, nome),
                 descricao = COALESCE($3, descricao),
                 preco = COALESCE($4, preco),
                 imagens = COALESCE($5, imagens),
                 categoria = COALESCE($6, categoria),
                 promocao = COALESCE($7, promocao),
                 preco_promocional = COALESCE($8, preco_promocional),
                 estoque = COALESCE($9, estoque),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(update.nome.as_deref())
        .bind(update.descricao.as_deref())
        .bind(update.preco)
        .bind(update.imagens.as_ref().map(Json))
        .bind(update.categoria.as_deref())
        .bind(update.promocao)
        .bind(update.preco_promocional)
        .bind(update.estoque)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Product::from(row))
    }

    /// Soft-delete a product by clearing its active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
