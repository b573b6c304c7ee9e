// SPDX-License-Identifier: MIT

//! PlateShare client core: browse, create, edit and like shared recipes.
//!
//! This crate owns everything between the rendering layer and the remote
//! recipe API: the canonical data model, an in-memory query-able recipe
//! collection, the HTTP client for the authoritative backend, the
//! authentication layer, and the session controller that ties them
//! together. Rendering and routing are external collaborators.

pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod validate;

use std::sync::Arc;

use config::Config;
use services::{AuthProvider, AuthService, HttpRecipeBackend, RecipeBackend};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub recipes: Arc<dyn RecipeBackend>,
    pub auth: AuthService,
}

impl AppState {
    /// Build state against the live HTTP backend described by `config`.
    pub fn new(config: Config, provider: Arc<dyn AuthProvider>) -> anyhow::Result<Self> {
        let recipes: Arc<dyn RecipeBackend> = Arc::new(HttpRecipeBackend::new(&config)?);
        Ok(Self::with_backend(config, recipes, provider))
    }

    /// Build state over an arbitrary backend implementation.
    pub fn with_backend(
        config: Config,
        recipes: Arc<dyn RecipeBackend>,
        provider: Arc<dyn AuthProvider>,
    ) -> Self {
        let auth = AuthService::new(provider, recipes.clone());
        Self {
            config,
            recipes,
            auth,
        }
    }
}
