//! Checkout flow against a real database.
//!
//! Covers the full order lifecycle: cart lines frozen into a pending
//! snapshot, the gateway's payment ID recorded, the cart cleared, and
//! stock untouched until the webhook confirms payment.

use rust_decimal_macros::dec;
use sqlx::PgPool;

use mks_store_api::db::cart::CartRepository;
use mks_store_api::db::orders::OrderRepository;
use mks_store_api::db::products::ProductRepository;
use mks_store_api::services::checkout::{CheckoutError, CheckoutRequest, CheckoutService};
use mks_store_api::services::webhook::{WebhookNotification, WebhookService};
use mks_store_core::OrderStatus;
use mks_store_integration_tests::{
    FixedGateway, charge, endereco, seed_cart_line, seed_product, seed_user,
};

const NOTIFICATION_URL: &str = "https://loja.example/webhook/mercadopago";

fn checkout_request() -> CheckoutRequest {
    CheckoutRequest {
        endereco: endereco(),
        frete: dec!(15.00),
        payment_method: "pix".to_string(),
    }
}

#[sqlx::test(migrations = "../api/migrations")]
async fn test_place_order_freezes_snapshot_and_clears_cart(pool: PgPool) {
    let user = seed_user(&pool, "comprador@example.com").await;
    let product = seed_product(&pool, dec!(40.00), 5).await;
    seed_cart_line(&pool, user.id, product.id, 2).await;

    let gateway = FixedGateway::new(charge(901, "pending", None));
    let service = CheckoutService::new(&pool, &gateway, NOTIFICATION_URL.to_string());

    let outcome = service
        .place_order(&user, checkout_request())
        .await
        .expect("checkout");

    let order = OrderRepository::new(&pool)
        .get_by_id(outcome.order_id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, dec!(95.00));
    assert_eq!(order.frete, dec!(15.00));
    assert_eq!(order.payment_id.as_deref(), Some("901"));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantidade, 2);
    assert_eq!(order.items[0].preco, dec!(40.00));
    assert_eq!(order.items[0].subtotal, dec!(80.00));

    let cart = CartRepository::new(&pool)
        .list_with_products(user.id)
        .await
        .expect("query cart");
    assert!(cart.is_empty());

    // Stock moves only when the webhook confirms the payment.
    let product = ProductRepository::new(&pool)
        .get(product.id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(product.estoque, 5);
    assert_eq!(gateway.calls(), 1);
}

#[sqlx::test(migrations = "../api/migrations")]
async fn test_checkout_then_approved_webhook_settles_order(pool: PgPool) {
    let user = seed_user(&pool, "comprador@example.com").await;
    let product = seed_product(&pool, dec!(40.00), 5).await;
    seed_cart_line(&pool, user.id, product.id, 2).await;

    let checkout_gateway = FixedGateway::new(charge(902, "pending", None));
    let outcome = CheckoutService::new(&pool, &checkout_gateway, NOTIFICATION_URL.to_string())
        .place_order(&user, checkout_request())
        .await
        .expect("checkout");

    let webhook_gateway = FixedGateway::new(charge(902, "approved", Some(outcome.order_id)));
    let notification: WebhookNotification = serde_json::from_value(serde_json::json!({
        "type": "payment",
        "data": { "id": 902 }
    }))
    .expect("deserialize");
    WebhookService::new(&pool, &webhook_gateway)
        .process(&notification)
        .await
        .expect("webhook delivery");

    let order = OrderRepository::new(&pool)
        .get_by_id(outcome.order_id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(order.status, OrderStatus::Paid);

    let product = ProductRepository::new(&pool)
        .get(product.id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(product.estoque, 3);
}

#[sqlx::test(migrations = "../api/migrations")]
async fn test_empty_cart_places_no_order(pool: PgPool) {
    let user = seed_user(&pool, "comprador@example.com").await;

    let gateway = FixedGateway::new(charge(903, "pending", None));
    let service = CheckoutService::new(&pool, &gateway, NOTIFICATION_URL.to_string());

    let err = service
        .place_order(&user, checkout_request())
        .await
        .expect_err("empty cart must be rejected");
    assert!(matches!(err, CheckoutError::EmptyCart));

    let orders = OrderRepository::new(&pool)
        .list_for_user(user.id)
        .await
        .expect("query orders");
    assert!(orders.is_empty());
    assert_eq!(gateway.calls(), 0);
}
