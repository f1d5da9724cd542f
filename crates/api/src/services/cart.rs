//! Cart view assembly.
//!
//! Pure functions that turn cart lines joined with live product data into
//! the priced view the API returns.

use rust_decimal::Decimal;
use serde::Serialize;

use mks_store_core::{CartItemId, ProductId};

use crate::models::cart::CartItem;
use crate::models::product::Product;

/// A product summary embedded in a cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub nome: String,
    pub preco: Decimal,
    pub preco_promocional: Option<Decimal>,
    pub promocao: bool,
    pub imagens: Vec<String>,
    pub estoque: i32,
}

/// A priced cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub produto: CartProduct,
    pub quantidade: i32,
    pub subtotal: Decimal,
}

/// The full cart view returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: Decimal,
}

/// Build the priced cart view from joined cart lines.
///
/// Lines whose product has been deactivated are silently skipped; the cart
/// row itself is left in place so the product reappears if reactivated.
/// Subtotals use the effective (promotional) price at view time.
#[must_use]
pub fn build_cart_view(lines: Vec<(CartItem, Product)>) -> CartView {
    let mut items = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for (item, product) in lines {
        if !product.is_active {
            continue;
        }

        let preco = product.effective_price();
        let subtotal = preco * Decimal::from(item.quantidade);
        total += subtotal;

        items.push(CartLine {
            id: item.id,
            produto: CartProduct {
                id: product.id,
                nome: product.nome,
                preco: product.preco,
                preco_promocional: product.preco_promocional,
                promocao: product.promocao,
                imagens: product.imagens,
                estoque: product.estoque,
            },
            quantidade: item.quantidade,
            subtotal,
        });
    }

    CartView { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mks_store_core::UserId;
    use rust_decimal_macros::dec;

    fn product(id: i32, preco: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            nome: format!("Produto {id}"),
            descricao: None,
            preco,
            imagens: vec![],
            categoria: "geral".to_string(),
            promocao: false,
            preco_promocional: None,
            estoque: 10,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn line(item_id: i32, product: Product, quantidade: i32) -> (CartItem, Product) {
        (
            CartItem {
                id: CartItemId::new(item_id),
                user_id: UserId::new(1),
                product_id: product.id,
                quantidade,
                created_at: Utc::now(),
            },
            product,
        )
    }

    #[test]
    fn test_empty_cart() {
        let view = build_cart_view(vec![]);
        assert!(view.items.is_empty());
        assert_eq!(view.total, Decimal::ZERO);
    }

    #[test]
    fn test_totals_sum_line_subtotals() {
        let view = build_cart_view(vec![
            line(1, product(10, dec!(80.00)), 1),
            line(2, product(11, dec!(10.00)), 2),
        ]);

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].subtotal, dec!(80.00));
        assert_eq!(view.items[1].subtotal, dec!(20.00));
        assert_eq!(view.total, dec!(100.00));
    }

    #[test]
    fn test_promotional_price_used_in_subtotal() {
        let mut p = product(10, dec!(100.00));
        p.promocao = true;
        p.preco_promocional = Some(dec!(75.00));

        let view = build_cart_view(vec![line(1, p, 2)]);
        assert_eq!(view.items[0].subtotal, dec!(150.00));
        assert_eq!(view.total, dec!(150.00));
    }

    #[test]
    fn test_inactive_products_skipped() {
        let mut inactive = product(10, dec!(50.00));
        inactive.is_active = false;

        let view = build_cart_view(vec![
            line(1, inactive, 1),
            line(2, product(11, dec!(30.00)), 1),
        ]);

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total, dec!(30.00));
    }
}
