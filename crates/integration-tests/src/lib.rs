//! Shared harness for the MKS Store integration tests.
//!
//! Tests run against a real Postgres database provisioned per test by
//! `#[sqlx::test]`, with the payment gateway replaced by [`FixedGateway`]
//! so no network is involved.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use mks_store_api::db::cart::CartRepository;
use mks_store_api::db::products::ProductRepository;
use mks_store_api::db::users::UserRepository;
use mks_store_api::models::order::Endereco;
use mks_store_api::models::product::{NewProduct, Product};
use mks_store_api::models::user::User;
use mks_store_api::services::mercadopago::{Charge, ChargeRequest, GatewayError, PaymentGateway};
use mks_store_core::{Email, OrderId, ProductId, UserId};

/// Payment gateway stub that answers every call with one canned charge.
pub struct FixedGateway {
    charge: Charge,
    calls: AtomicUsize,
}

impl FixedGateway {
    #[must_use]
    pub const fn new(charge: Charge) -> Self {
        Self {
            charge,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of gateway calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FixedGateway {
    async fn create_charge(&self, _req: &ChargeRequest) -> Result<Charge, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.charge.clone())
    }

    async fn get_charge(&self, _payment_id: &str) -> Result<Charge, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.charge.clone())
    }
}

/// Build a gateway charge, optionally referencing an order.
#[must_use]
pub fn charge(id: i64, status: &str, order: Option<OrderId>) -> Charge {
    Charge {
        id: Some(id),
        status: Some(status.to_string()),
        external_reference: order.map(|o| o.to_string()),
        extra: serde_json::Map::new(),
    }
}

/// Insert a user with a placeholder password hash.
///
/// # Panics
///
/// Panics if the insert fails; test databases start empty.
pub async fn seed_user(pool: &PgPool, email: &str) -> User {
    let email = Email::parse(email).expect("valid email");
    UserRepository::new(pool)
        .create_with_password(&email, "$argon2id$placeholder", "Cliente Teste")
        .await
        .expect("create user")
}

/// Insert an active product with the given price and stock.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn seed_product(pool: &PgPool, preco: Decimal, estoque: i32) -> Product {
    ProductRepository::new(pool)
        .create(&NewProduct {
            nome: "Caneca MKS".to_string(),
            descricao: None,
            preco,
            imagens: vec![],
            categoria: "geral".to_string(),
            promocao: false,
            preco_promocional: None,
            estoque,
        })
        .await
        .expect("create product")
}

/// Put `quantidade` units of a product in the user's cart.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn seed_cart_line(pool: &PgPool, user_id: UserId, product_id: ProductId, quantidade: i32) {
    CartRepository::new(pool)
        .add(user_id, product_id, quantidade)
        .await
        .expect("add cart line");
}

/// Delivery address used across the tests.
#[must_use]
pub fn endereco() -> Endereco {
    Endereco {
        cep: "01310-100".to_string(),
        logradouro: "Avenida Paulista".to_string(),
        numero: "1000".to_string(),
        complemento: String::new(),
        bairro: "Bela Vista".to_string(),
        cidade: "São Paulo".to_string(),
        uf: "SP".to_string(),
    }
}
