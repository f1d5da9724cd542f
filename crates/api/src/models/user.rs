//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mks_store_core::{Email, Role, UserId};

/// A store user (domain type).
///
/// The password hash is deliberately kept out of this type; it only surfaces
/// through `UserRepository::get_password_hash` during login.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub nome: String,
    /// Profile photo (URL or base64 data URI).
    pub foto: Option<String>,
    /// Profile bio.
    pub bio: Option<String>,
    /// Theme color preference.
    pub tema_cor: String,
    /// Permission role.
    pub role: Role,
    /// Google subject ID for OAuth-only accounts.
    #[serde(skip_serializing)]
    pub google_id: Option<String>,
    /// When the user was created.
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub nome: Option<String>,
    pub bio: Option<String>,
    pub tema_cor: Option<String>,
    pub foto: Option<String>,
}
