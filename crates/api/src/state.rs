//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::google::GoogleClient;
use crate::services::mercadopago::{MercadoPagoClient, PaymentGateway};
use crate::services::viacep::ViaCepClient;

/// Application state shared across all request handlers.
///
/// Cheap to clone; the inner state lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    gateway: Arc<dyn PaymentGateway>,
    viacep: ViaCepClient,
    google: Option<GoogleClient>,
}

impl AppState {
    /// Create application state with the real payment gateway.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let gateway = Arc::new(MercadoPagoClient::new(&config));
        Self::with_gateway(config, pool, gateway)
    }

    /// Create application state with an explicit gateway implementation.
    #[must_use]
    pub fn with_gateway(config: AppConfig, pool: PgPool, gateway: Arc<dyn PaymentGateway>) -> Self {
        let viacep = ViaCepClient::new(&config.viacep_base_url);
        let google = config
            .google_client_id
            .clone()
            .map(GoogleClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gateway,
                viacep,
                google,
            }),
        }
    }

    /// Get the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the payment gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.inner.gateway.as_ref()
    }

    /// Get the CEP lookup client.
    #[must_use]
    pub fn viacep(&self) -> &ViaCepClient {
        &self.inner.viacep
    }

    /// Get the Google token verifier, if configured.
    #[must_use]
    pub fn google(&self) -> Option<&GoogleClient> {
        self.inner.google.as_ref()
    }
}
