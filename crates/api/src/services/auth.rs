//! Authentication service.
//!
//! Password registration/login (argon2), Google OAuth login, and signed
//! session tokens (JWT, 24h expiry).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use mks_store_core::{Email, Role, UserId};

use super::google::GoogleIdentity;
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Session token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mks_store_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Google identity token rejected.
    #[error("invalid Google token")]
    InvalidGoogleToken,

    /// Session token missing, malformed, or expired.
    #[error("invalid session token")]
    Token,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User's email address.
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    /// Expiry as Unix epoch seconds.
    pub exp: i64,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email, password and display name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nome: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let senha_hash = hash_password(password)?;

        let user = self
            .users
            .create_with_password(&email, &senha_hash, nome)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong
    /// or the account has no password (OAuth-only).
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, senha_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &senha_hash)?;

        Ok(user)
    }

    /// Login with a verified Google identity, registering on first login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if Google asserts a malformed email.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn login_google(&self, identity: &GoogleIdentity) -> Result<User, AuthError> {
        let email = Email::parse(&identity.email)?;

        if let Some(user) = self.users.get_by_email(&email).await? {
            return Ok(user);
        }

        let user = self
            .users
            .create_google(
                &email,
                &identity.nome,
                identity.foto.as_deref(),
                &identity.google_id,
            )
            .await?;

        Ok(user)
    }

    /// Load the user a verified token's claims refer to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the user no longer exists.
    pub async fn user_for_claims(&self, claims: &Claims) -> Result<User, AuthError> {
        self.users
            .get_by_id(UserId::new(claims.user_id))
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }
}

// =============================================================================
// Session tokens
// =============================================================================

/// Issue a signed session token for a user.
///
/// # Errors
///
/// Returns `AuthError::Token` if signing fails.
pub fn issue_token(secret: &SecretString, user: &User) -> Result<String, AuthError> {
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp();
    let claims = Claims {
        sub: user.email.to_string(),
        user_id: user.id.as_i32(),
        role: user.role,
        exp,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|_| AuthError::Token)
}

/// Verify a session token and return its claims.
///
/// Expiry is validated; expired or tampered tokens are rejected.
///
/// # Errors
///
/// Returns `AuthError::Token` for invalid or expired tokens.
pub fn verify_token(secret: &SecretString, token: &str) -> Result<Claims, AuthError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::Token)
}

// =============================================================================
// Passwords
// =============================================================================

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "A senha deve ter pelo menos {MIN_PASSWORD_LENGTH} caracteres"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: UserId::new(7),
            email: Email::parse("maria@example.com").expect("email"),
            nome: "Maria".to_string(),
            foto: None,
            bio: None,
            tema_cor: "#000000".to_string(),
            role: Role::Admin,
            google_id: None,
            created_at: Utc::now(),
        }
    }

    fn secret() -> SecretString {
        SecretString::from("test-secret-that-is-long-enough-0000")
    }

    #[test]
    fn test_token_roundtrip() {
        let user = test_user();
        let token = issue_token(&secret(), &user).expect("issue");
        let claims = verify_token(&secret(), &token).expect("verify");

        assert_eq!(claims.sub, "maria@example.com");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = issue_token(&secret(), &test_user()).expect("issue");
        let other = SecretString::from("a-completely-different-secret-1111");
        assert!(matches!(verify_token(&other, &token), Err(AuthError::Token)));
    }

    #[test]
    fn test_token_rejected_when_tampered() {
        let mut token = issue_token(&secret(), &test_user()).expect("issue");
        token.push('x');
        assert!(matches!(
            verify_token(&secret(), &token),
            Err(AuthError::Token)
        ));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("curta"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("longa-o-suficiente").is_ok());
    }
}
