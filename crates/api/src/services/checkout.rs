//! Checkout orchestration.
//!
//! Validates the cart, freezes an order snapshot, creates the payment
//! charge at the gateway and clears the cart. The order is persisted in
//! `pending` before the gateway is called; payment confirmation arrives
//! later through the webhook reconciler.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use mks_store_core::{OrderId, ProductId};

use super::mercadopago::{Charge, ChargeRequest, GatewayError, PaymentGateway};
use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::cart::CartItem;
use crate::models::order::{Endereco, NewOrder, OrderItem};
use crate::models::product::Product;
use crate::models::user::User;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no purchasable lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a deactivated product.
    #[error("product {0} is unavailable")]
    ProductUnavailable(ProductId),

    /// A cart line asks for more units than are in stock.
    #[error("insufficient stock for {0}")]
    InsufficientStock(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Payment gateway error.
    #[error("payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Checkout request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub endereco: Endereco,
    pub frete: Decimal,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "pix".to_string()
}

/// Result of a successful checkout.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,
    pub payment: Charge,
}

/// Freeze cart lines into order items, validating availability and stock.
///
/// Returns the frozen lines and the items subtotal (shipping excluded).
/// Unit prices are the effective prices at this moment; later product
/// edits don't touch the snapshot.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if there are no lines.
/// Returns `CheckoutError::ProductUnavailable` for deactivated products.
/// Returns `CheckoutError::InsufficientStock` when stock can't cover a line.
pub fn build_order_lines(
    lines: &[(CartItem, Product)],
) -> Result<(Vec<OrderItem>, Decimal), CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut items = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for (item, product) in lines {
        if !product.is_active {
            return Err(CheckoutError::ProductUnavailable(product.id));
        }
        if product.estoque < item.quantidade {
            return Err(CheckoutError::InsufficientStock(product.nome.clone()));
        }

        let preco = product.effective_price();
        let subtotal = preco * Decimal::from(item.quantidade);
        total += subtotal;

        items.push(OrderItem {
            product_id: product.id,
            nome: product.nome.clone(),
            preco,
            quantidade: item.quantidade,
            subtotal,
        });
    }

    Ok((items, total))
}

/// Checkout service wiring repositories to the payment gateway.
pub struct CheckoutService<'a> {
    cart: CartRepository<'a>,
    orders: OrderRepository<'a>,
    gateway: &'a dyn PaymentGateway,
    notification_url: String,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub fn new(pool: &'a PgPool, gateway: &'a dyn PaymentGateway, notification_url: String) -> Self {
        Self {
            cart: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
            gateway,
            notification_url,
        }
    }

    /// Place an order from the user's current cart.
    ///
    /// The order is created in `pending` first; if the gateway call then
    /// fails, the pending order remains and the error propagates. On
    /// success the gateway's payment ID is recorded and the cart cleared.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`].
    pub async fn place_order(
        &self,
        user: &User,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let lines = self.cart.list_with_products(user.id).await?;
        let (items, items_total) = build_order_lines(&lines)?;
        let total = items_total + request.frete;

        let order = self
            .orders
            .create(&NewOrder {
                user_id: user.id,
                total,
                frete: request.frete,
                payment_method: request.payment_method.clone(),
                endereco: request.endereco,
                items,
            })
            .await?;

        let charge = self
            .gateway
            .create_charge(&ChargeRequest {
                order_id: order.id,
                total,
                email: user.email.to_string(),
                nome: user.nome.clone(),
                payment_method: request.payment_method,
                notification_url: self.notification_url.clone(),
            })
            .await?;

        if let Some(payment_id) = charge.id {
            self.orders
                .set_payment_id(order.id, &payment_id.to_string())
                .await?;
        }

        self.cart.clear(user.id).await?;

        tracing::info!(order_id = %order.id, payment_id = ?charge.id, "order placed");

        Ok(CheckoutOutcome {
            order_id: order.id,
            payment: charge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mks_store_core::{CartItemId, UserId};
    use rust_decimal_macros::dec;

    fn product(id: i32, preco: Decimal, estoque: i32) -> Product {
        Product {
            id: ProductId::new(id),
            nome: format!("Produto {id}"),
            descricao: None,
            preco,
            imagens: vec![],
            categoria: "geral".to_string(),
            promocao: false,
            preco_promocional: None,
            estoque,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn line(product: Product, quantidade: i32) -> (CartItem, Product) {
        (
            CartItem {
                id: CartItemId::new(1),
                user_id: UserId::new(1),
                product_id: product.id,
                quantidade,
                created_at: Utc::now(),
            },
            product,
        )
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(matches!(
            build_order_lines(&[]),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_snapshot_totals() {
        let lines = vec![
            line(product(1, dec!(80.00), 5), 1),
            line(product(2, dec!(10.00), 5), 2),
        ];

        let (items, total) = build_order_lines(&lines).expect("ok");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].subtotal, dec!(80.00));
        assert_eq!(items[1].subtotal, dec!(20.00));
        assert_eq!(total, dec!(100.00));
    }

    #[test]
    fn test_snapshot_uses_effective_price() {
        let mut p = product(1, dec!(40.00), 10);
        p.promocao = true;
        p.preco_promocional = Some(dec!(25.00));

        let (items, total) = build_order_lines(&[line(p, 4)]).expect("ok");
        assert_eq!(items[0].preco, dec!(25.00));
        assert_eq!(items[0].subtotal, dec!(100.00));
        assert_eq!(total, dec!(100.00));
    }

    #[test]
    fn test_inactive_product_fails_checkout() {
        let mut p = product(3, dec!(10.00), 5);
        p.is_active = false;

        assert!(matches!(
            build_order_lines(&[line(p, 1)]),
            Err(CheckoutError::ProductUnavailable(id)) if id == ProductId::new(3)
        ));
    }

    #[test]
    fn test_insufficient_stock_fails_checkout() {
        let p = product(4, dec!(10.00), 2);

        assert!(matches!(
            build_order_lines(&[line(p, 3)]),
            Err(CheckoutError::InsufficientStock(nome)) if nome == "Produto 4"
        ));
    }

    #[test]
    fn test_stock_exactly_covering_quantity_passes() {
        let p = product(5, dec!(10.00), 3);
        let (items, _) = build_order_lines(&[line(p, 3)]).expect("ok");
        assert_eq!(items[0].quantidade, 3);
    }
}
