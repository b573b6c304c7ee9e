//! User model: the client-visible projection of an authenticated user.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Read-only, session-scoped user projection. The auth provider and the
/// backend own the durable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Backend identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Profile picture URL (may be empty)
    pub photo_url: String,
}

/// Wire-shape user as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "photoUrl")]
    pub photo_url: String,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            email: raw.email,
            photo_url: raw.photo_url,
        }
    }
}

/// How the account was established with the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Email,
    Google,
}

/// Payload to provision a backend user for a provider identity.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub auth_type: AuthType,
}
