//! Order repository for database operations.
//!
//! Orders are immutable snapshots; after creation only two writes exist:
//! recording the gateway's payment ID, and the conditional status
//! transition used by the webhook reconciler.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use mks_store_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::{Endereco, NewOrder, Order, OrderItem};

const ORDER_COLUMNS: &str =
    "id, user_id, total, frete, status, payment_id, payment_method, endereco, items, created_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total: Decimal,
    frete: Decimal,
    status: String,
    payment_id: Option<String>,
    payment_method: String,
    endereco: Json<Endereco>,
    items: Json<Vec<OrderItem>>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_domain(self) -> Result<Order, RepositoryError> {
        let status = OrderStatus::parse(&self.status).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            total: self.total,
            frete: self.frete,
            status,
            payment_id: self.payment_id,
            payment_method: self.payment_method,
            endereco: self.endereco.0,
            items: self.items.0,
            created_at: self.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order in `pending` status with no payment ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (user_id, total, frete, payment_method, endereco, items)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new.user_id)
        .bind(new.total)
        .bind(new.frete)
        .bind(&new.payment_method)
        .bind(Json(&new.endereco))
        .bind(Json(&new.items))
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_domain).transpose()
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    /// Record the gateway-assigned payment ID on an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_payment_id(
        &self,
        id: OrderId,
        payment_id: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE orders SET payment_id = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(payment_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Atomically settle an order out of `pending`.
    ///
    /// The status update is guarded by the current status, so concurrent
    /// webhook deliveries for the same order race on a single conditional
    /// write: exactly one observes `true`. Returns `false` when the order
    /// was already in a terminal state.
    ///
    /// On a transition into `paid`, each line's stock decrement runs in the
    /// same transaction as the status write. A failure mid-decrement rolls
    /// the status back to `pending`, so the gateway's retry repeats the
    /// whole settlement instead of finding a paid order with stale stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query or the commit fails.
    pub async fn settle_from_pending(
        &self,
        id: OrderId,
        to: OrderStatus,
        items: &[OrderItem],
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE orders SET status = $2, updated_at = now()
             WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(to)
        .bind(OrderStatus::Pending)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if to == OrderStatus::Paid {
            for item in items {
                sqlx::query(
                    "UPDATE products SET estoque = estoque - $2, updated_at = now()
                     WHERE id = $1",
                )
                .bind(item.product_id)
                .bind(item.quantidade)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }
}
