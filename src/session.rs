// SPDX-License-Identifier: MIT

//! Session controller: root owner of the current viewer and the recipe
//! snapshot.
//!
//! All shared state lives here and is handed to views as read-only
//! projections; there are no ambient singletons. After any mutating call
//! the affected state is re-fetched from the authoritative remote API
//! and replaced wholesale - local and server state are never merged.

use std::sync::Arc;

use crate::collection::{self, LikeState, RecipeCollection, RecipeQuery};
use crate::error::AppError;
use crate::models::{AuthorSummary, Recipe, RecipeDraft, User};
use crate::services::auth::{Persistence, ProviderIdentity};
use crate::validate::{self, SignInForm, SignUpForm};
use crate::AppState;

/// Everything the per-user dashboard renders.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub recipes: Vec<Recipe>,
    pub summary: AuthorSummary,
}

/// One user-facing session: the current viewer plus the recipe snapshot.
pub struct Session {
    state: Arc<AppState>,
    viewer: Option<User>,
    collection: RecipeCollection,
    /// Bumped every time the snapshot is replaced; fetches issued against
    /// an older generation are discarded instead of applied.
    generation: u64,
}

impl Session {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            viewer: None,
            collection: RecipeCollection::new(),
            generation: 0,
        }
    }

    /// The signed-in viewer, if any (read-only projection).
    pub fn viewer(&self) -> Option<&User> {
        self.viewer.as_ref()
    }

    /// The current snapshot (read-only projection).
    pub fn recipes(&self) -> &RecipeCollection {
        &self.collection
    }

    /// Token identifying the current snapshot; pass it back to
    /// [`Session::apply_snapshot`] when fetching out-of-band.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ─── Auth ────────────────────────────────────────────────────────────

    pub async fn sign_in(
        &mut self,
        form: &SignInForm,
        persistence: Persistence,
    ) -> Result<User, AppError> {
        let user = self.state.auth.sign_in(form, persistence).await?;
        self.viewer = Some(user.clone());
        Ok(user)
    }

    pub async fn sign_up(&mut self, form: &SignUpForm) -> Result<User, AppError> {
        let user = self.state.auth.sign_up(form).await?;
        self.viewer = Some(user.clone());
        Ok(user)
    }

    pub async fn sign_in_with_google(
        &mut self,
        identity: ProviderIdentity,
    ) -> Result<User, AppError> {
        let user = self.state.auth.sign_in_with_google(identity).await?;
        self.viewer = Some(user.clone());
        Ok(user)
    }

    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        if let Some(user) = self.viewer.clone() {
            self.state.auth.sign_out(&user.email).await?;
            self.viewer = None;
        }
        Ok(())
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AppError> {
        self.state.auth.reset_password(email).await
    }

    /// Update the viewer's display profile locally; the provider owns
    /// the durable copy.
    pub fn update_profile(&mut self, name: &str, photo_url: &str) -> Result<&User, AppError> {
        let viewer = self
            .viewer
            .as_mut()
            .ok_or_else(|| AppError::Auth("Sign in to update your profile".to_string()))?;

        viewer.name = name.to_string();
        viewer.photo_url = photo_url.to_string();
        Ok(viewer)
    }

    // ─── Snapshot ────────────────────────────────────────────────────────

    /// Fetch all recipes and replace the snapshot wholesale.
    pub async fn refresh_recipes(&mut self) -> Result<(), AppError> {
        let issued = self.generation;
        let recipes = self.state.recipes.list_recipes(None).await?;
        self.apply_snapshot(issued, recipes);
        Ok(())
    }

    /// Install a fetched snapshot. Returns `false` (and changes nothing)
    /// when the snapshot was already replaced after the fetch was
    /// issued; the stale result is discarded, never applied.
    pub fn apply_snapshot(&mut self, issued: u64, recipes: Vec<Recipe>) -> bool {
        if issued != self.generation {
            tracing::debug!(
                issued,
                current = self.generation,
                "Discarding stale recipe snapshot"
            );
            return false;
        }

        self.generation += 1;
        self.collection.load(recipes);
        true
    }

    /// Re-fetch one recipe and replace its local projection wholesale.
    pub async fn refresh_recipe(&mut self, id: &str) -> Result<Recipe, AppError> {
        let fetched = self.state.recipes.get_recipe(id).await?;
        self.collection.upsert(fetched.recipe.clone());
        Ok(fetched.recipe)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Evaluate a filtered, paginated page over the current snapshot.
    pub fn browse(&self, query: &RecipeQuery, page_size: usize, page: usize) -> Vec<&Recipe> {
        collection::paginate(&self.collection.filter(query), page_size, page)
    }

    /// Like-state of a snapshot recipe as seen by the current viewer.
    pub fn like_state(&self, recipe_id: &str) -> Option<LikeState> {
        let viewer_id = self.viewer.as_ref().map(|user| user.id.as_str());
        self.collection
            .get(recipe_id)
            .map(|recipe| collection::derive_like_state(recipe, viewer_id))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Toggle the viewer's like on a recipe.
    ///
    /// The mutation is never applied locally first: issue the PATCH,
    /// re-fetch the recipe, replace the local projection. A rejection
    /// (e.g. liking one's own recipe) leaves local state untouched.
    pub async fn toggle_like(&mut self, recipe_id: &str) -> Result<LikeState, AppError> {
        let viewer_id = self
            .viewer
            .as_ref()
            .map(|user| user.id.clone())
            .ok_or_else(|| AppError::Auth("Sign in to like recipes".to_string()))?;

        self.state.recipes.toggle_like(recipe_id, &viewer_id).await?;

        let fresh = self.refresh_recipe(recipe_id).await?;
        Ok(collection::derive_like_state(&fresh, Some(&viewer_id)))
    }

    /// Create a recipe, then re-fetch the full list.
    pub async fn create_recipe(&mut self, draft: &RecipeDraft) -> Result<Recipe, AppError> {
        validate::check(draft)?;
        let created = self.state.recipes.create_recipe(draft).await?;
        self.refresh_recipes().await?;
        Ok(created)
    }

    /// Full-field update, then re-fetch the affected recipe.
    pub async fn update_recipe(
        &mut self,
        id: &str,
        draft: &RecipeDraft,
    ) -> Result<Recipe, AppError> {
        validate::check(draft)?;
        self.state.recipes.update_recipe(id, draft).await?;
        self.refresh_recipe(id).await
    }

    /// Delete a recipe, then re-fetch the full list.
    pub async fn delete_recipe(&mut self, id: &str) -> Result<(), AppError> {
        self.state.recipes.delete_recipe(id).await?;
        self.refresh_recipes().await
    }

    // ─── Dashboard ───────────────────────────────────────────────────────

    /// The viewer's recipes and aggregate counts.
    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let viewer = self
            .viewer
            .as_ref()
            .ok_or_else(|| AppError::Auth("Sign in to view your dashboard".to_string()))?;

        let recipes = self.state.recipes.my_recipes(&viewer.id).await?;
        let summary = self.state.recipes.author_summary(&viewer.id).await?;

        Ok(Dashboard { recipes, summary })
    }
}
