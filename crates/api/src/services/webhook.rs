//! Payment webhook reconciliation.
//!
//! Notifications carry only a payment ID; the authoritative status is
//! re-fetched from the gateway, never trusted from the notification body.
//! Delivery is at-least-once and unordered, so the status write is a
//! single conditional transition out of `pending`.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use mks_store_core::{OrderId, OrderStatus};

use super::mercadopago::{GatewayError, PaymentGateway};
use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;

/// Errors that can occur while processing a webhook notification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Payment gateway error while re-fetching the payment.
    #[error("payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Notification body posted by the payment gateway.
///
/// Only the notification type and payment ID are read; everything else in
/// the body is ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookNotification {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<WebhookData>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    /// Payment ID; the gateway sends it as a string or a number.
    pub id: Option<serde_json::Value>,
}

impl WebhookNotification {
    /// Extract the payment ID, if this is a payment notification.
    #[must_use]
    pub fn payment_id(&self) -> Option<String> {
        if self.kind.as_deref() != Some("payment") {
            return None;
        }

        match self.data.as_ref()?.id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Map a gateway payment status to the order transition it triggers.
///
/// Unknown and in-flight statuses (`in_process`, `pending`, ...) map to
/// `None`: the order stays `pending` until a conclusive status arrives.
#[must_use]
pub fn transition_for(payment_status: &str) -> Option<OrderStatus> {
    match payment_status {
        "approved" => Some(OrderStatus::Paid),
        "cancelled" | "rejected" => Some(OrderStatus::Cancelled),
        _ => None,
    }
}

/// Webhook reconciliation service.
pub struct WebhookService<'a> {
    orders: OrderRepository<'a>,
    gateway: &'a dyn PaymentGateway,
}

impl<'a> WebhookService<'a> {
    /// Create a new webhook service.
    #[must_use]
    pub fn new(pool: &'a PgPool, gateway: &'a dyn PaymentGateway) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            gateway,
        }
    }

    /// Process one webhook notification.
    ///
    /// Non-payment notifications, unknown payments and orders that can't be
    /// resolved are acknowledged without effect; redelivery wouldn't help.
    /// Gateway and database failures propagate so the caller returns a
    /// non-2xx and the gateway retries.
    ///
    /// # Errors
    ///
    /// See [`WebhookError`].
    pub async fn process(&self, notification: &WebhookNotification) -> Result<(), WebhookError> {
        let Some(payment_id) = notification.payment_id() else {
            tracing::debug!("ignoring non-payment webhook notification");
            return Ok(());
        };

        let charge = self.gateway.get_charge(&payment_id).await?;

        let Some(order_id) = charge
            .external_reference
            .as_deref()
            .and_then(|r| r.parse::<i32>().ok())
            .map(OrderId::new)
        else {
            tracing::warn!(payment_id, "payment has no usable external reference");
            return Ok(());
        };

        let Some(order) = self.orders.get_by_id(order_id).await? else {
            tracing::warn!(payment_id, %order_id, "webhook references unknown order");
            return Ok(());
        };

        let Some(status) = charge.status.as_deref() else {
            tracing::warn!(payment_id, "payment has no status");
            return Ok(());
        };

        let Some(target) = transition_for(status) else {
            tracing::debug!(payment_id, status, "payment status not conclusive yet");
            return Ok(());
        };

        // The status write and the stock decrements commit together, and
        // only on the winning transition into `paid`, so redeliveries never
        // decrement twice and a failed settlement stays `pending`.
        let settled = self
            .orders
            .settle_from_pending(order_id, target, &order.items)
            .await?;
        if !settled {
            tracing::debug!(%order_id, "order already settled, skipping");
            return Ok(());
        }

        tracing::info!(%order_id, status = target.as_str(), "order settled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_for_conclusive_statuses() {
        assert_eq!(transition_for("approved"), Some(OrderStatus::Paid));
        assert_eq!(transition_for("cancelled"), Some(OrderStatus::Cancelled));
        assert_eq!(transition_for("rejected"), Some(OrderStatus::Cancelled));
    }

    #[test]
    fn test_transition_for_inconclusive_statuses() {
        assert_eq!(transition_for("pending"), None);
        assert_eq!(transition_for("in_process"), None);
        assert_eq!(transition_for("charged_back"), None);
        assert_eq!(transition_for(""), None);
    }

    #[test]
    fn test_payment_id_from_string() {
        let n: WebhookNotification =
            serde_json::from_value(serde_json::json!({
                "type": "payment",
                "data": { "id": "12345" }
            }))
            .expect("deserialize");
        assert_eq!(n.payment_id().as_deref(), Some("12345"));
    }

    #[test]
    fn test_payment_id_from_number() {
        let n: WebhookNotification =
            serde_json::from_value(serde_json::json!({
                "type": "payment",
                "data": { "id": 12345 }
            }))
            .expect("deserialize");
        assert_eq!(n.payment_id().as_deref(), Some("12345"));
    }

    #[test]
    fn test_non_payment_notification_ignored() {
        let n: WebhookNotification =
            serde_json::from_value(serde_json::json!({
                "type": "merchant_order",
                "data": { "id": "99" }
            }))
            .expect("deserialize");
        assert_eq!(n.payment_id(), None);
    }

    #[test]
    fn test_missing_fields_tolerated() {
        let n: WebhookNotification =
            serde_json::from_value(serde_json::json!({})).expect("deserialize");
        assert_eq!(n.payment_id(), None);

        let n: WebhookNotification =
            serde_json::from_value(serde_json::json!({ "type": "payment" }))
                .expect("deserialize");
        assert_eq!(n.payment_id(), None);
    }
}
