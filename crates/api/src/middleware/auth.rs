//! Authentication extractors.
//!
//! Handlers opt into authentication by taking `CurrentUser` (any logged-in
//! user) or `RequireAdmin` (admin role) as an argument.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::models::user::User;
use crate::services::auth::{AuthService, verify_token};
use crate::state::AppState;

/// Extracts the authenticated user from the `Authorization: Bearer` header.
///
/// Rejects with 401 if the header is missing, 403 if the token is invalid
/// or expired, and 401 if the token's user no longer exists.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Não autenticado".to_string()))?;

        let claims = verify_token(&state.config().jwt_secret, token)
            .map_err(|_| AppError::Forbidden("Token inválido ou expirado".to_string()))?;

        let user = AuthService::new(state.pool())
            .user_for_claims(&claims)
            .await
            .map_err(AppError::from)?;

        Ok(Self(user))
    }
}

/// Extracts the authenticated user and requires the admin role.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden(
                "Acesso restrito a administradores".to_string(),
            ));
        }

        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
