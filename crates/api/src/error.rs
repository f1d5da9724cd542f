//! API error type and HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`. The `IntoResponse` impl
//! maps domain errors to status codes, reports unexpected failures to
//! Sentry and scrubs internal details from 5xx bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::http::Envelope;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::mercadopago::GatewayError;
use crate::services::webhook::WebhookError;

/// Top-level API error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed validation (400).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Payment gateway error.
    #[error("payment gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Anything else unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Gateway(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message exposed to the client. Internal details never leak.
    fn public_message(&self) -> String {
        match self {
            Self::Validation(m) | Self::Unauthorized(m) | Self::Forbidden(m) | Self::NotFound(m) => {
                m.clone()
            }
            Self::Database(RepositoryError::NotFound) => "Recurso não encontrado".to_string(),
            Self::Database(RepositoryError::Conflict(m)) => m.clone(),
            Self::Database(_) | Self::Gateway(_) | Self::Internal(_) => {
                "Erro interno do servidor".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
        }

        (status, Json(Envelope::failure(self.public_message()))).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidEmail(e) => Self::Validation(format!("Email inválido: {e}")),
            AuthError::InvalidCredentials => {
                Self::Unauthorized("Credenciais inválidas".to_string())
            }
            AuthError::EmailTaken => Self::Validation("Email já cadastrado".to_string()),
            AuthError::WeakPassword(m) => Self::Validation(m),
            AuthError::InvalidGoogleToken => {
                Self::Unauthorized("Token do Google inválido".to_string())
            }
            AuthError::Token => Self::Forbidden("Token inválido ou expirado".to_string()),
            AuthError::Repository(e) => Self::Database(e),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart => Self::Validation("Carrinho vazio".to_string()),
            CheckoutError::ProductUnavailable(id) => {
                Self::Validation(format!("Produto {id} não está disponível"))
            }
            CheckoutError::InsufficientStock(nome) => {
                Self::Validation(format!("Estoque insuficiente para {nome}"))
            }
            CheckoutError::Repository(e) => Self::Database(e),
            CheckoutError::Gateway(e) => Self::Gateway(e),
        }
    }
}

impl From<WebhookError> for AppError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::Repository(e) => Self::Database(e),
            WebhookError::Gateway(e) => Self::Gateway(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(RepositoryError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(RepositoryError::Conflict("dup".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_scrubbed() {
        let e = AppError::Internal("connection pool exhausted".into());
        assert_eq!(e.public_message(), "Erro interno do servidor");
    }

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            AppError::from(AuthError::InvalidCredentials),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::EmailTaken),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::Token),
            AppError::Forbidden(_)
        ));
    }

    #[test]
    fn test_checkout_error_mapping() {
        assert!(matches!(
            AppError::from(CheckoutError::EmptyCart),
            AppError::Validation(_)
        ));
    }
}
