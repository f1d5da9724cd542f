//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mks_store_core::{OrderId, OrderStatus, ProductId, UserId};

/// Delivery address captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endereco {
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    #[serde(default)]
    pub complemento: String,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
}

/// One line of an order's frozen snapshot.
///
/// Copied from the live product at checkout; later product edits must not
/// alter it. `preco` is the effective unit price at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub nome: String,
    pub preco: Decimal,
    pub quantidade: i32,
    pub subtotal: Decimal,
}

/// An order: the immutable snapshot created at checkout.
///
/// `status` is the only field mutated after creation, and only by the
/// webhook reconciler through a conditional transition out of `pending`.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub frete: Decimal,
    pub status: OrderStatus,
    /// Gateway-assigned payment ID; NULL until the gateway responds.
    pub payment_id: Option<String>,
    pub payment_method: String,
    pub endereco: Endereco,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

/// Fields for persisting a new `pending` order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: Decimal,
    pub frete: Decimal,
    pub payment_method: String,
    pub endereco: Endereco,
    pub items: Vec<OrderItem>,
}
