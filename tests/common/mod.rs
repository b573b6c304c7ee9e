// SPDX-License-Identifier: MIT

//! Shared test fixtures: an in-memory recipe backend that plays the
//! authoritative remote API, and a canned auth provider.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use plateshare::collection::apply_like_toggle;
use plateshare::config::Config;
use plateshare::error::AppError;
use plateshare::models::{AuthorSummary, NewUser, RawRecipe, Recipe, RecipeDraft, User};
use plateshare::services::auth::{AuthProvider, Persistence, ProviderIdentity};
use plateshare::services::recipes::{RecipeBackend, RecipeWithAuthor};
use plateshare::session::Session;
use plateshare::AppState;

static INIT: Once = Once::new();

/// Install a test subscriber once per binary.
#[allow(dead_code)]
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Build a canonical recipe for tests.
#[allow(dead_code)]
pub fn make_recipe(id: &str, title: &str, cuisine: &str, author_id: &str) -> Recipe {
    let mut recipe = RawRecipe {
        id: id.to_string(),
        title: title.to_string(),
        image: format!("https://img.example/{}.png", id),
        cuisine_type: cuisine.to_string(),
        preparation_time: 30,
        ingredients: vec!["salt".to_string(), "water".to_string()],
        instructions: vec!["prep".to_string(), "cook".to_string()],
        categories: vec!["Dinner".to_string()],
        likes: vec![],
        author: None,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-01T10:00:00Z".to_string(),
        views: None,
    }
    .into_canonical();
    recipe.author_id = author_id.to_string();
    recipe
}

/// In-memory stand-in for the remote recipe API. Authoritative for its
/// own state, like the real one: mutations apply here and the client is
/// expected to re-fetch.
#[derive(Default)]
pub struct FakeBackend {
    recipes: Mutex<Vec<Recipe>>,
    users: Mutex<Vec<User>>,
    next_id: AtomicUsize,
    /// Total backend calls; validation short-circuits keep this at zero.
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn seeded(recipes: Vec<Recipe>) -> Arc<Self> {
        let backend = Self::default();
        // Keep generated ids clear of the seeded ones
        backend.next_id.store(recipes.len(), Ordering::SeqCst);
        *backend.recipes.lock().unwrap() = recipes;
        Arc::new(backend)
    }

    pub fn seed_user(&self, id: &str, name: &str, email: &str) {
        self.users.lock().unwrap().push(User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            photo_url: String::new(),
        });
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recipe(&self, id: &str) -> Option<Recipe> {
        self.recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl RecipeBackend for FakeBackend {
    async fn list_recipes(&self, limit: Option<u32>) -> Result<Vec<Recipe>, AppError> {
        self.bump();
        let recipes = self.recipes.lock().unwrap();
        let cap = limit.map(|n| n as usize).unwrap_or(recipes.len());
        Ok(recipes.iter().take(cap).cloned().collect())
    }

    async fn get_recipe(&self, id: &str) -> Result<RecipeWithAuthor, AppError> {
        self.bump();
        let recipe = self
            .recipe(id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", id)))?;
        let author = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == recipe.author_id)
            .cloned();
        Ok(RecipeWithAuthor { recipe, author })
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, AppError> {
        self.bump();
        let recipe = Recipe {
            id: self.fresh_id("r"),
            title: draft.title.clone(),
            image: draft.image.clone(),
            cuisine_type: draft.cuisine_type.clone(),
            preparation_time: draft.preparation_time,
            ingredients: draft.ingredients.clone(),
            instructions: draft.instructions.clone(),
            categories: draft.categories.clone(),
            liked_by: vec![],
            author_id: draft.author_id.clone(),
            created_at: "2024-06-01T12:00:00Z".to_string(),
            updated_at: "2024-06-01T12:00:00Z".to_string(),
            views: None,
        };
        self.recipes.lock().unwrap().push(recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<Recipe, AppError> {
        self.bump();
        let mut recipes = self.recipes.lock().unwrap();
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", id)))?;

        recipe.title = draft.title.clone();
        recipe.image = draft.image.clone();
        recipe.cuisine_type = draft.cuisine_type.clone();
        recipe.preparation_time = draft.preparation_time;
        recipe.ingredients = draft.ingredients.clone();
        recipe.instructions = draft.instructions.clone();
        recipe.categories = draft.categories.clone();
        recipe.updated_at = "2024-06-02T12:00:00Z".to_string();
        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, id: &str) -> Result<(), AppError> {
        self.bump();
        let mut recipes = self.recipes.lock().unwrap();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        if recipes.len() == before {
            return Err(AppError::NotFound(format!("recipe {}", id)));
        }
        Ok(())
    }

    async fn toggle_like(&self, id: &str, viewer_id: &str) -> Result<(), AppError> {
        self.bump();
        let mut recipes = self.recipes.lock().unwrap();
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", id)))?;

        // The remote rule the client never enforces locally
        if recipe.author_id == viewer_id {
            return Err(AppError::Rejected(
                "You cannot like your own recipe".to_string(),
            ));
        }

        *recipe = apply_like_toggle(recipe, viewer_id);
        Ok(())
    }

    async fn my_recipes(&self, user_id: &str) -> Result<Vec<Recipe>, AppError> {
        self.bump();
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.author_id == user_id)
            .cloned()
            .collect())
    }

    async fn author_summary(&self, user_id: &str) -> Result<AuthorSummary, AppError> {
        self.bump();
        let mine: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.author_id == user_id)
            .cloned()
            .collect();
        Ok(AuthorSummary::from_recipes(&mine))
    }

    async fn login(&self, email: &str) -> Result<User, AppError> {
        self.bump();
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {}", email)))
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        self.bump();
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter().find(|u| u.email == new_user.email) {
            return Ok(existing.clone());
        }

        let user = User {
            id: self.fresh_id("u"),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            photo_url: new_user.photo_url.clone(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Canned auth provider: succeeds unless told to reject.
#[derive(Default)]
pub struct FakeAuthProvider {
    pub reject: AtomicBool,
}

#[allow(dead_code)]
impl FakeAuthProvider {
    pub fn rejecting() -> Arc<Self> {
        let provider = Self::default();
        provider.reject.store(true, Ordering::SeqCst);
        Arc::new(provider)
    }

    fn identity(email: &str, name: &str) -> ProviderIdentity {
        ProviderIdentity {
            subject: format!("prov-{}", email),
            email: email.to_string(),
            name: name.to_string(),
            photo_url: None,
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in(
        &self,
        email: &str,
        _password: &str,
        _persistence: Persistence,
    ) -> Result<ProviderIdentity, AppError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }
        Ok(Self::identity(email, email.split('@').next().unwrap_or("")))
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        name: &str,
        photo_url: Option<&str>,
    ) -> Result<ProviderIdentity, AppError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(AppError::Auth("Sign up failed".to_string()));
        }
        let mut identity = Self::identity(email, name);
        identity.photo_url = photo_url.map(String::from);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn reset_password(&self, _email: &str) -> Result<(), AppError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(AppError::Auth("Unknown email".to_string()));
        }
        Ok(())
    }
}

/// Session wired to a fake backend and a permissive provider.
#[allow(dead_code)]
pub fn build_session(backend: Arc<FakeBackend>) -> Session {
    build_session_with(backend, Arc::new(FakeAuthProvider::default()))
}

#[allow(dead_code)]
pub fn build_session_with(
    backend: Arc<FakeBackend>,
    provider: Arc<FakeAuthProvider>,
) -> Session {
    let state = AppState::with_backend(Config::test_default(), backend, provider);
    Session::new(Arc::new(state))
}

/// A signed-in session for viewer `u2` over three seeded recipes
/// (`r1` authored by `u1`, `r2`/`r3` authored by `u2`).
#[allow(dead_code)]
pub async fn signed_in_session() -> (Arc<FakeBackend>, Session) {
    let backend = FakeBackend::seeded(vec![
        make_recipe("r1", "Pasta Bake", "Italian", "u1"),
        make_recipe("r2", "Tacos", "Mexican", "u2"),
        make_recipe("r3", "Sushi Rolls", "Japanese", "u2"),
    ]);
    backend.seed_user("u2", "Bea", "bea@example.com");

    let mut session = build_session(backend.clone());
    let form = plateshare::validate::SignInForm {
        email: "bea@example.com".to_string(),
        password: "Secret1".to_string(),
    };
    session
        .sign_in(&form, Persistence::Session)
        .await
        .expect("seeded sign-in should succeed");
    session.refresh_recipes().await.expect("seeded refresh");

    (backend, session)
}
