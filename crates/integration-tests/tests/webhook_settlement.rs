//! Webhook settlement against a real database.
//!
//! Gateway delivery is at-least-once and unordered, so the invariant under
//! test is that redelivered notifications settle an order and decrement
//! stock exactly once, and that a failed settlement leaves the order
//! `pending` for the next retry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use mks_store_api::db::orders::OrderRepository;
use mks_store_api::db::products::ProductRepository;
use mks_store_api::models::order::{NewOrder, Order, OrderItem};
use mks_store_api::models::product::Product;
use mks_store_api::services::webhook::{WebhookNotification, WebhookService};
use mks_store_core::OrderStatus;
use mks_store_integration_tests::{FixedGateway, charge, endereco, seed_product, seed_user};

/// Seed a user, a product with 10 units in stock, and a pending order for
/// `quantidade` of them.
async fn pending_order(pool: &PgPool, preco: Decimal, quantidade: i32) -> (Order, Product) {
    let user = seed_user(pool, "comprador@example.com").await;
    let product = seed_product(pool, preco, 10).await;

    let subtotal = preco * Decimal::from(quantidade);
    let order = OrderRepository::new(pool)
        .create(&NewOrder {
            user_id: user.id,
            total: subtotal + dec!(20.00),
            frete: dec!(20.00),
            payment_method: "pix".to_string(),
            endereco: endereco(),
            items: vec![OrderItem {
                product_id: product.id,
                nome: product.nome.clone(),
                preco,
                quantidade,
                subtotal,
            }],
        })
        .await
        .expect("create order");

    (order, product)
}

fn payment_notification(id: i64) -> WebhookNotification {
    serde_json::from_value(serde_json::json!({
        "type": "payment",
        "data": { "id": id }
    }))
    .expect("deserialize")
}

#[sqlx::test(migrations = "../api/migrations")]
async fn test_duplicate_approved_delivery_decrements_stock_once(pool: PgPool) {
    let (order, product) = pending_order(&pool, dec!(50.00), 3).await;

    let gateway = FixedGateway::new(charge(555, "approved", Some(order.id)));
    let service = WebhookService::new(&pool, &gateway);
    let notification = payment_notification(555);

    service.process(&notification).await.expect("first delivery");
    service.process(&notification).await.expect("second delivery");

    let settled = OrderRepository::new(&pool)
        .get_by_id(order.id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(settled.status, OrderStatus::Paid);

    let product = ProductRepository::new(&pool)
        .get(product.id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(product.estoque, 7);
}

#[sqlx::test(migrations = "../api/migrations")]
async fn test_rejected_payment_cancels_without_touching_stock(pool: PgPool) {
    let (order, product) = pending_order(&pool, dec!(50.00), 2).await;

    let gateway = FixedGateway::new(charge(556, "rejected", Some(order.id)));
    let service = WebhookService::new(&pool, &gateway);

    service
        .process(&payment_notification(556))
        .await
        .expect("delivery");

    let settled = OrderRepository::new(&pool)
        .get_by_id(order.id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(settled.status, OrderStatus::Cancelled);

    let product = ProductRepository::new(&pool)
        .get(product.id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(product.estoque, 10);
}

#[sqlx::test(migrations = "../api/migrations")]
async fn test_inconclusive_status_leaves_order_pending(pool: PgPool) {
    let (order, product) = pending_order(&pool, dec!(50.00), 2).await;

    let gateway = FixedGateway::new(charge(557, "in_process", Some(order.id)));
    let service = WebhookService::new(&pool, &gateway);

    service
        .process(&payment_notification(557))
        .await
        .expect("delivery");

    let settled = OrderRepository::new(&pool)
        .get_by_id(order.id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(settled.status, OrderStatus::Pending);

    let product = ProductRepository::new(&pool)
        .get(product.id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(product.estoque, 10);
}

#[sqlx::test(migrations = "../api/migrations")]
async fn test_failed_decrement_rolls_back_settlement(pool: PgPool) {
    // A quantity of i32::MIN makes `estoque - quantidade` overflow the int4
    // stock column, so the decrement fails after the status write succeeded
    // inside the same transaction.
    let (order, product) = pending_order(&pool, dec!(0.00), i32::MIN).await;

    let gateway = FixedGateway::new(charge(558, "approved", Some(order.id)));
    let service = WebhookService::new(&pool, &gateway);

    service
        .process(&payment_notification(558))
        .await
        .expect_err("settlement must fail");

    // The status write rolled back with the decrement: the next retry sees
    // a pending order, not a paid order with stale stock.
    let settled = OrderRepository::new(&pool)
        .get_by_id(order.id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(settled.status, OrderStatus::Pending);

    let product = ProductRepository::new(&pool)
        .get(product.id)
        .await
        .expect("query product")
        .expect("product exists");
    assert_eq!(product.estoque, 10);
}
