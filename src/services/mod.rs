// SPDX-License-Identifier: MIT

//! Services module - remote collaborators behind trait seams.

pub mod auth;
pub mod google;
pub mod recipes;

pub use auth::{AuthProvider, AuthService, Persistence, ProviderIdentity};
pub use google::GoogleTokenVerifier;
pub use recipes::{HttpRecipeBackend, RecipeBackend, RecipeWithAuthor};
