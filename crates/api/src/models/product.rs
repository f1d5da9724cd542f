//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mks_store_core::ProductId;

/// A catalog entry.
///
/// Products are soft-deleted: `is_active = false` hides them from the
/// catalog and the cart but keeps the row for historical orders.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub nome: String,
    pub descricao: Option<String>,
    /// List price.
    pub preco: Decimal,
    pub imagens: Vec<String>,
    pub categoria: String,
    /// Whether the promotional price is currently active.
    pub promocao: bool,
    pub preco_promocional: Option<Decimal>,
    /// Live stock count, decremented when an order is paid.
    pub estoque: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays right now: the promotional price when
    /// the promotion flag is set and a promotional price exists, else the
    /// list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        if self.promocao {
            self.preco_promocional.unwrap_or(self.preco)
        } else {
            self.preco
        }
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub preco: Decimal,
    #[serde(default)]
    pub imagens: Vec<String>,
    pub categoria: String,
    #[serde(default)]
    pub promocao: bool,
    #[serde(default)]
    pub preco_promocional: Option<Decimal>,
    #[serde(default)]
    pub estoque: i32,
}

/// Partial product update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub preco: Option<Decimal>,
    #[serde(default)]
    pub imagens: Option<Vec<String>>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub promocao: Option<bool>,
    #[serde(default)]
    pub preco_promocional: Option<Decimal>,
    #[serde(default)]
    pub estoque: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(preco: &str, promo: Option<&str>, promocao: bool) -> Product {
        Product {
            id: ProductId::new(1),
            nome: "Vestido".to_string(),
            descricao: None,
            preco: preco.parse().expect("decimal"),
            imagens: vec![],
            categoria: "Feminina".to_string(),
            promocao,
            preco_promocional: promo.map(|p| p.parse().expect("decimal")),
            estoque: 10,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_price_list() {
        let p = product("50.00", Some("40.00"), false);
        assert_eq!(p.effective_price(), "50.00".parse::<Decimal>().expect("d"));
    }

    #[test]
    fn test_effective_price_promo() {
        let p = product("50.00", Some("40.00"), true);
        assert_eq!(p.effective_price(), "40.00".parse::<Decimal>().expect("d"));
    }

    #[test]
    fn test_effective_price_promo_flag_without_price() {
        let p = product("50.00", None, true);
        assert_eq!(p.effective_price(), "50.00".parse::<Decimal>().expect("d"));
    }
}
