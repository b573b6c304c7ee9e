// SPDX-License-Identifier: MIT

//! Recipe API client: the consumed remote contract and its HTTP
//! implementation.
//!
//! The remote service is authoritative for all recipe and user state;
//! this client never caches. Raw payloads pass through the model
//! normalization adapter before crossing the trait boundary.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    AuthorSummary, NewUser, RawRecipe, RawUser, Recipe, RecipeDraft, User,
};

/// A recipe fetched together with its author projection.
#[derive(Debug, Clone)]
pub struct RecipeWithAuthor {
    pub recipe: Recipe,
    pub author: Option<User>,
}

/// The remote recipe API as consumed by this client.
///
/// The HTTP implementation is [`HttpRecipeBackend`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    /// `GET /recipes?limit=N` - list recipes, optionally capped.
    async fn list_recipes(&self, limit: Option<u32>) -> Result<Vec<Recipe>, AppError>;

    /// `GET /recipes/{id}` - one recipe plus its author projection.
    async fn get_recipe(&self, id: &str) -> Result<RecipeWithAuthor, AppError>;

    /// `POST /recipes` - create; the server assigns id and timestamps.
    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, AppError>;

    /// `PUT /recipes/{id}` - full-field replacement of mutable fields.
    async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<Recipe, AppError>;

    /// `DELETE /recipes/{id}`
    async fn delete_recipe(&self, id: &str) -> Result<(), AppError>;

    /// `PATCH /recipes/{id}/like` - toggle or add a like. The remote may
    /// decline (e.g. liking one's own recipe); that surfaces as
    /// [`AppError::Rejected`], an expected outcome.
    async fn toggle_like(&self, id: &str, viewer_id: &str) -> Result<(), AppError>;

    /// `GET /recipes/mine/{userId}` - recipes authored by a user.
    async fn my_recipes(&self, user_id: &str) -> Result<Vec<Recipe>, AppError>;

    /// `GET /recipes/summary/{userId}` - aggregate counts for a user.
    async fn author_summary(&self, user_id: &str) -> Result<AuthorSummary, AppError>;

    /// `POST /users/login` - backend projection for a provider-
    /// authenticated email.
    async fn login(&self, email: &str) -> Result<User, AppError>;

    /// `POST /users` - provision a backend user for a provider identity
    /// (idempotent upsert on the backend side).
    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError>;
}

/// HTTP implementation of [`RecipeBackend`].
#[derive(Clone)]
pub struct HttpRecipeBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRecipeBackend {
    /// Create a client for the API at `config.api_base_url`.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("failed building recipe API HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        Self::check_response_json(response).await
    }

    /// Check response status and return an error if not successful.
    async fn check_response(response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_for(response).await)
    }

    /// Check response and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("JSON parse error: {}", e)))
    }

    /// Map a non-success response to the error taxonomy.
    async fn error_for(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body);

        if status == reqwest::StatusCode::NOT_FOUND {
            return AppError::NotFound(
                message.unwrap_or_else(|| "resource not found".to_string()),
            );
        }

        tracing::warn!(status = %status, "Recipe API declined request");
        AppError::Rejected(message.unwrap_or_else(|| format!("HTTP {}", status)))
    }
}

#[async_trait]
impl RecipeBackend for HttpRecipeBackend {
    async fn list_recipes(&self, limit: Option<u32>) -> Result<Vec<Recipe>, AppError> {
        let mut request = self.http.get(self.url("/recipes"));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let payload: RecipeListPayload = Self::check_response_json(response).await?;
        Ok(payload.into_recipes())
    }

    async fn get_recipe(&self, id: &str) -> Result<RecipeWithAuthor, AppError> {
        let url = self.url(&format!("/recipes/{}", urlencoding::encode(id)));
        let payload: RecipeEnvelope = self.get_json(&url).await?;

        Ok(RecipeWithAuthor {
            recipe: payload.recipe.into_canonical(),
            author: payload.author.map(User::from),
        })
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, AppError> {
        let response = self
            .http
            .post(self.url("/recipes"))
            .json(draft)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let raw: RawRecipe = Self::check_response_json(response).await?;
        tracing::debug!(recipe = %raw.id, "Recipe created");
        Ok(raw.into_canonical())
    }

    async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<Recipe, AppError> {
        let url = self.url(&format!("/recipes/{}", urlencoding::encode(id)));
        let response = self
            .http
            .put(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let raw: RawRecipe = Self::check_response_json(response).await?;
        Ok(raw.into_canonical())
    }

    async fn delete_recipe(&self, id: &str) -> Result<(), AppError> {
        let url = self.url(&format!("/recipes/{}", urlencoding::encode(id)));
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        Self::check_response(response).await
    }

    async fn toggle_like(&self, id: &str, viewer_id: &str) -> Result<(), AppError> {
        let url = self.url(&format!("/recipes/{}/like", urlencoding::encode(id)));
        let body = serde_json::json!({ "viewerId": viewer_id });

        let response = self
            .http
            .patch(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        Self::check_response(response).await
    }

    async fn my_recipes(&self, user_id: &str) -> Result<Vec<Recipe>, AppError> {
        let url = self.url(&format!("/recipes/mine/{}", urlencoding::encode(user_id)));
        let payload: RecipeListPayload = self.get_json(&url).await?;
        Ok(payload.into_recipes())
    }

    async fn author_summary(&self, user_id: &str) -> Result<AuthorSummary, AppError> {
        let url = self.url(&format!(
            "/recipes/summary/{}",
            urlencoding::encode(user_id)
        ));
        self.get_json(&url).await
    }

    async fn login(&self, email: &str) -> Result<User, AppError> {
        let response = self
            .http
            .post(self.url("/users/login"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let payload: UserPayload = Self::check_response_json(response).await?;
        Ok(payload.into_user())
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let response = self
            .http
            .post(self.url("/users"))
            .json(new_user)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let payload: UserPayload = Self::check_response_json(response).await?;
        let user = payload.into_user();
        tracing::debug!(user = %user.id, "Backend user provisioned");
        Ok(user)
    }
}

/// Pull a human-readable message out of an error body, if the backend
/// sent one.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "details"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(String::from))
}

// ─── Wire payloads ───────────────────────────────────────────────────────
//
// Backend variants disagree on envelopes as much as on field names, so
// list and user payloads accept both the bare and the wrapped form.

/// Recipe list: a bare array or a wrapped `{ recipes: [...] }` /
/// `{ getMyRecipes: [...] }` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeListPayload {
    Plain(Vec<RawRecipe>),
    Wrapped {
        #[serde(alias = "getMyRecipes")]
        recipes: Vec<RawRecipe>,
    },
}

impl RecipeListPayload {
    fn into_recipes(self) -> Vec<Recipe> {
        let raw = match self {
            RecipeListPayload::Plain(raw) => raw,
            RecipeListPayload::Wrapped { recipes } => recipes,
        };
        raw.into_iter().map(RawRecipe::into_canonical).collect()
    }
}

/// One recipe plus its author projection.
#[derive(Debug, Deserialize)]
struct RecipeEnvelope {
    recipe: RawRecipe,
    #[serde(default, alias = "user")]
    author: Option<RawUser>,
}

/// A user: bare or wrapped in `{ user: ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserPayload {
    Wrapped { user: RawUser },
    Plain(RawUser),
}

impl UserPayload {
    fn into_user(self) -> User {
        match self {
            UserPayload::Wrapped { user } => user.into(),
            UserPayload::Plain(user) => user.into(),
        }
    }
}
