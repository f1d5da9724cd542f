//! Mercado Pago payment gateway client.
//!
//! The orchestrator and the webhook reconciler only depend on the
//! [`PaymentGateway`] trait, so alternate providers (and test stubs) can be
//! substituted without touching either.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mks_store_core::OrderId;

use crate::config::AppConfig;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Charge amount could not be represented for the gateway.
    #[error("invalid charge amount: {0}")]
    InvalidAmount(Decimal),
}

/// Everything the gateway needs to create a charge for an order.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// Order the charge pays for; sent as the gateway's external reference.
    pub order_id: OrderId,
    pub total: Decimal,
    pub email: String,
    pub nome: String,
    pub payment_method: String,
    /// URL the gateway will call back with status notifications.
    pub notification_url: String,
}

/// The gateway's representation of a payment.
///
/// Only the fields the reconciler needs are typed; the rest of the
/// response is carried through `extra` so checkout can hand the full
/// charge back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    pub id: Option<i64>,
    pub status: Option<String>,
    pub external_reference: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Capability interface for the payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a charge for an order.
    async fn create_charge(&self, req: &ChargeRequest) -> Result<Charge, GatewayError>;

    /// Fetch the current state of a payment by its gateway ID.
    async fn get_charge(&self, payment_id: &str) -> Result<Charge, GatewayError>;
}

/// Mercado Pago REST API client.
#[derive(Clone)]
pub struct MercadoPagoClient {
    http: reqwest::Client,
    access_token: SecretString,
    base_url: String,
}

impl MercadoPagoClient {
    /// Create a new Mercado Pago client from configuration.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: config.mercadopago_access_token.clone(),
            base_url: config.mercadopago_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn parse_charge(response: reqwest::Response) -> Result<Charge, GatewayError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Charge>()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn create_charge(&self, req: &ChargeRequest) -> Result<Charge, GatewayError> {
        let amount = req
            .total
            .to_f64()
            .ok_or(GatewayError::InvalidAmount(req.total))?;

        let body = serde_json::json!({
            "transaction_amount": amount,
            "description": format!("Pedido MKS Store #{}", req.order_id),
            "payment_method_id": req.payment_method,
            "payer": {
                "email": req.email,
                "first_name": req.nome,
            },
            "external_reference": req.order_id.to_string(),
            "notification_url": req.notification_url,
        });

        let response = self
            .http
            .post(format!("{}/v1/payments", self.base_url))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        Self::parse_charge(response).await
    }

    async fn get_charge(&self, payment_id: &str) -> Result<Charge, GatewayError> {
        let response = self
            .http
            .get(format!("{}/v1/payments/{payment_id}", self.base_url))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await?;

        Self::parse_charge(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_deserializes_gateway_payload() {
        let json = r#"{
            "id": 12345678,
            "status": "approved",
            "external_reference": "42",
            "transaction_amount": 100.0,
            "point_of_interaction": {"type": "PIX"}
        }"#;

        let charge: Charge = serde_json::from_str(json).expect("deserialize");
        assert_eq!(charge.id, Some(12_345_678));
        assert_eq!(charge.status.as_deref(), Some("approved"));
        assert_eq!(charge.external_reference.as_deref(), Some("42"));
        assert!(charge.extra.contains_key("point_of_interaction"));
    }

    #[test]
    fn test_charge_tolerates_missing_fields() {
        let charge: Charge = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(charge.id, None);
        assert_eq!(charge.status, None);
        assert_eq!(charge.external_reference, None);
    }
}
