// SPDX-License-Identifier: MIT

//! Authentication layer: the provider seam and backend reconciliation.
//!
//! The auth provider (email/password or Google) vouches for an identity;
//! the recipe backend owns the user record the rest of the app sees.
//! Signing in therefore always ends with a backend round-trip that
//! yields the canonical [`User`] projection.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{AuthType, NewUser, User};
use crate::services::google::GoogleTokenVerifier;
use crate::services::recipes::RecipeBackend;
use crate::validate::{self, SignInForm, SignUpForm};

/// Credential persistence choice for email sign-in: session-scoped or
/// surviving restarts. Recording the choice is the client's job;
/// honoring it is the provider's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Session,
    Local,
}

/// Identity the auth provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    /// Provider-scoped subject identifier
    pub subject: String,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
}

/// External authentication provider contract.
///
/// Implementations are the session's source of identity; each operation
/// is asynchronous and yields a verified identity or a failure.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
        persistence: Persistence,
    ) -> Result<ProviderIdentity, AppError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        photo_url: Option<&str>,
    ) -> Result<ProviderIdentity, AppError>;

    async fn sign_out(&self) -> Result<(), AppError>;

    async fn reset_password(&self, email: &str) -> Result<(), AppError>;
}

/// High-level auth service combining a provider with the backend user
/// store.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    backend: Arc<dyn RecipeBackend>,
    /// Backend user projections keyed by email; avoids re-posting login
    /// for every auth-state emission within a session.
    users: Arc<DashMap<String, User>>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>, backend: Arc<dyn RecipeBackend>) -> Self {
        Self {
            provider,
            backend,
            users: Arc::new(DashMap::new()),
        }
    }

    /// Email/password sign-in: validate locally, authenticate with the
    /// provider, then fetch the backend projection for that email.
    pub async fn sign_in(
        &self,
        form: &SignInForm,
        persistence: Persistence,
    ) -> Result<User, AppError> {
        validate::check(form)?;

        let identity = self
            .provider
            .sign_in(&form.email, &form.password, persistence)
            .await?;

        let user = self.backend_user(&identity.email).await?;
        tracing::info!(user = %user.id, "Signed in");
        Ok(user)
    }

    /// Email/password sign-up: validate locally (including the checks
    /// the derive cannot express), register with the provider, then
    /// provision the backend user.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<User, AppError> {
        validate::check_sign_up(form)?;

        let identity = self
            .provider
            .sign_up(
                &form.email,
                &form.password,
                &form.name,
                form.photo_url.as_deref(),
            )
            .await?;

        let user = self
            .backend
            .create_user(&NewUser {
                name: identity.name,
                email: identity.email,
                photo_url: identity.photo_url.unwrap_or_default(),
                auth_type: AuthType::Email,
            })
            .await?;

        tracing::info!(user = %user.id, "Signed up");
        self.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    /// Google sign-in for an already verified identity: the backend
    /// upserts the user record keyed by email.
    pub async fn sign_in_with_google(
        &self,
        identity: ProviderIdentity,
    ) -> Result<User, AppError> {
        let user = self
            .backend
            .create_user(&NewUser {
                name: identity.name,
                email: identity.email,
                photo_url: identity.photo_url.unwrap_or_default(),
                auth_type: AuthType::Google,
            })
            .await?;

        tracing::info!(user = %user.id, "Signed in with Google");
        self.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    /// Verify a Google ID token and complete Google sign-in.
    pub async fn sign_in_with_google_token(
        &self,
        verifier: &GoogleTokenVerifier,
        id_token: &str,
    ) -> Result<User, AppError> {
        let identity = verifier.verify_id_token(id_token).await?;
        self.sign_in_with_google(identity).await
    }

    /// Sign out with the provider and drop the cached projection.
    pub async fn sign_out(&self, email: &str) -> Result<(), AppError> {
        self.provider.sign_out().await?;
        self.users.remove(email);
        Ok(())
    }

    /// Ask the provider to send a password reset email.
    pub async fn reset_password(&self, email: &str) -> Result<(), AppError> {
        validate::check_reset_email(email)?;
        self.provider.reset_password(email).await
    }

    async fn backend_user(&self, email: &str) -> Result<User, AppError> {
        if let Some(user) = self.users.get(email) {
            return Ok(user.clone());
        }

        let user = self.backend.login(email).await?;
        self.users.insert(email.to_string(), user.clone());
        Ok(user)
    }
}
