//! Registration and login endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::http::Envelope;
use crate::middleware::CurrentUser;
use crate::models::user::User;
use crate::services::auth::{AuthService, issue_token};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/google", post(google))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    nome: String,
    email: String,
    senha: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    senha: String,
}

#[derive(Debug, Deserialize)]
struct GoogleLoginRequest {
    /// Google-issued ID token from the client-side OAuth flow.
    token: String,
}

/// Session payload returned by all login endpoints.
#[derive(Debug, Serialize)]
struct SessionResponse {
    access_token: String,
    token_type: &'static str,
    user: User,
}

fn session_response(state: &AppState, user: User) -> Result<SessionResponse, AppError> {
    let access_token = issue_token(&state.config().jwt_secret, &user)?;
    Ok(SessionResponse {
        access_token,
        token_type: "bearer",
        user,
    })
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Envelope<SessionResponse>>, AppError> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.senha, &body.nome)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    let session = session_response(&state, user)?;
    Ok(Envelope::success_with_message(
        session,
        "Usuário cadastrado com sucesso",
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Envelope<SessionResponse>>, AppError> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.senha)
        .await?;

    let session = session_response(&state, user)?;
    Ok(Envelope::success(session))
}

async fn google(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginRequest>,
) -> Result<Json<Envelope<SessionResponse>>, AppError> {
    let Some(verifier) = state.google() else {
        return Err(AppError::Validation(
            "Login com Google não está habilitado".to_string(),
        ));
    };

    let identity = verifier
        .verify(&body.token)
        .await
        .map_err(|_| AppError::Unauthorized("Token do Google inválido".to_string()))?;

    let user = AuthService::new(state.pool()).login_google(&identity).await?;

    let session = session_response(&state, user)?;
    Ok(Envelope::success(session))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<Envelope<User>> {
    Envelope::success(user)
}
