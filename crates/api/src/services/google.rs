//! Google identity-token verification.
//!
//! Verifies an OAuth ID token against Google's `tokeninfo` endpoint and
//! checks that the token was issued for this application.

use serde::Deserialize;
use thiserror::Error;

const TOKENINFO_BASE_URL: &str = "https://oauth2.googleapis.com";

/// Errors that can occur verifying a Google identity token.
#[derive(Debug, Error)]
pub enum GoogleError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token rejected by Google, expired, or issued for another client.
    #[error("invalid Google identity token")]
    InvalidToken,
}

/// The identity asserted by a verified Google token.
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub email: String,
    pub nome: String,
    pub foto: Option<String>,
    /// Google subject ID.
    pub google_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    sub: String,
}

/// Google token verification client.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    base_url: String,
}

impl GoogleClient {
    /// Create a new client for the given OAuth client ID.
    #[must_use]
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            base_url: TOKENINFO_BASE_URL.to_string(),
        }
    }

    /// Verify an ID token and extract the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns `GoogleError::InvalidToken` if Google rejects the token or it
    /// was issued for a different client ID.
    pub async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleError> {
        let response = self
            .http
            .get(format!("{}/tokeninfo", self.base_url))
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GoogleError::InvalidToken);
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|_| GoogleError::InvalidToken)?;

        // A token issued for another application is not proof of identity here
        if info.aud != self.client_id {
            return Err(GoogleError::InvalidToken);
        }

        Ok(GoogleIdentity {
            nome: info.name.unwrap_or_else(|| info.email.clone()),
            email: info.email,
            foto: info.picture,
            google_id: info.sub,
        })
    }
}
