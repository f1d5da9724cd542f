//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mks_store_core::{CartItemId, ProductId, UserId};

/// One line of a user's cart.
///
/// Unique per (user, product); adding an already-present product increments
/// `quantidade` instead of creating a second row. `quantidade` is always
/// positive; a zero or negative quantity deletes the row.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantidade: i32,
    pub created_at: DateTime<Utc>,
}
