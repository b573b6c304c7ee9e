// SPDX-License-Identifier: MIT

//! Canonical recipe model and the remote-payload normalization boundary.
//!
//! The remote API is loosely shaped: identifiers arrive as `_id` or `id`,
//! preparation time as `prepTime` or `preparationTime`, like references as
//! bare identifier strings or embedded user objects. Every known variant
//! is mapped into one canonical [`Recipe`] here; no remote field name
//! leaks past this module.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::user::RawUser;

/// Cuisine vocabulary offered by the browse filter. "All" disables the
/// cuisine match.
pub const CUISINE_FILTERS: [&str; 9] = [
    "All",
    "Italian",
    "Mexican",
    "Chinese",
    "Indian",
    "Thai",
    "Mediterranean",
    "Korean",
    "Dessert",
];

/// Categories offered by the recipe form.
pub const PREDEFINED_CATEGORIES: [&str; 14] = [
    "Breakfast",
    "Lunch",
    "Dinner",
    "Dessert",
    "Appetizer",
    "Snack",
    "Vegetarian",
    "Vegan",
    "Dairy-Free",
    "Keto",
    "Paleo",
    "Healthy",
    "Quick & Easy",
    "Budget-Friendly",
];

/// One shared recipe, in canonical client shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Recipe {
    /// Identifier assigned by the remote API, immutable once set
    pub id: String,
    /// Recipe title
    pub title: String,
    /// Cover image URL
    pub image: String,
    /// Cuisine (open vocabulary: "Italian", "Mexican", ...)
    pub cuisine_type: String,
    /// Preparation time in minutes
    pub preparation_time: u32,
    /// Ingredient lines, order-significant
    pub ingredients: Vec<String>,
    /// Steps, order-significant, one entry per step
    pub instructions: Vec<String>,
    /// Category tags, display order preserved
    pub categories: Vec<String>,
    /// Viewers who liked this recipe (unique per viewer)
    pub liked_by: Vec<LikeRef>,
    /// Authoring user reference, not owned by the recipe
    pub author_id: String,
    /// Creation timestamp (ISO 8601, assigned remotely)
    pub created_at: String,
    /// Last update timestamp (ISO 8601, assigned remotely)
    pub updated_at: String,
    /// View count; only some backend variants report it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u32>,
}

impl Recipe {
    /// Cosmetic publication status: a recipe with both ingredients and
    /// instructions reads as published. There is no persisted status
    /// field behind this.
    pub fn display_status(&self) -> RecipeStatus {
        if !self.ingredients.is_empty() && !self.instructions.is_empty() {
            RecipeStatus::Published
        } else {
            RecipeStatus::Draft
        }
    }

    /// Whether the recipe was created within the last seven days.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|created| now - created.with_timezone(&Utc) < Duration::days(7))
            .unwrap_or(false)
    }
}

/// Display-only publication label derived from content completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeStatus {
    Published,
    Draft,
}

/// A like reference as the remote API ships it: either a bare viewer
/// identifier or an embedded user object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LikeRef {
    Id(String),
    User(LinkedUser),
}

impl LikeRef {
    /// Normalized comparison key: the referenced viewer identifier,
    /// trimmed. Every membership check goes through here so both wire
    /// forms compare identically.
    pub fn key(&self) -> &str {
        match self {
            LikeRef::Id(id) => id.trim(),
            LikeRef::User(user) => user.id.trim(),
        }
    }
}

/// Minimal embedded user projection seen inside like arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinkedUser {
    #[serde(alias = "_id")]
    pub id: String,
}

/// Author reference: bare identifier or embedded user object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(String),
    User(RawUser),
}

impl AuthorRef {
    pub fn id(&self) -> &str {
        match self {
            AuthorRef::Id(id) => id.trim(),
            AuthorRef::User(user) => user.id.trim(),
        }
    }
}

/// Wire-shape recipe as the remote API actually sends it.
///
/// Aliases capture every field-name variant observed across backend
/// versions. Convert with [`RawRecipe::into_canonical`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipe {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cuisine_type: String,
    #[serde(default, alias = "prepTime")]
    pub preparation_time: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, alias = "likedBy")]
    pub likes: Vec<LikeRef>,
    #[serde(default, alias = "userId", alias = "authorId")]
    pub author: Option<AuthorRef>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub views: Option<u32>,
}

impl RawRecipe {
    /// Map the wire shape into the canonical client shape.
    pub fn into_canonical(self) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title,
            image: self.image,
            cuisine_type: self.cuisine_type,
            preparation_time: self.preparation_time,
            ingredients: self.ingredients,
            instructions: self.instructions,
            categories: self.categories,
            liked_by: self.likes,
            author_id: self
                .author
                .map(|a| a.id().to_string())
                .unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            views: self.views,
        }
    }
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        raw.into_canonical()
    }
}

/// Mutable recipe fields as submitted to the remote API for create and
/// full-field update.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecipeDraft {
    #[serde(rename = "userId")]
    pub author_id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: String,
    #[validate(length(min = 1, message = "Cuisine type is required"))]
    pub cuisine_type: String,
    pub preparation_time: u32,
    #[validate(custom(function = "crate::validate::non_empty_entries"))]
    pub ingredients: Vec<String>,
    #[validate(custom(function = "crate::validate::non_empty_entries"))]
    pub instructions: Vec<String>,
    pub categories: Vec<String>,
}

/// Free-text form state for the recipe edit modal: ingredients and
/// categories are comma-delimited, instructions sentence-delimited.
#[derive(Debug, Clone, Default)]
pub struct RecipeFormText {
    pub title: String,
    pub image: String,
    pub cuisine_type: String,
    pub preparation_time: u32,
    pub ingredients: String,
    pub instructions: String,
    pub categories: String,
}

impl RecipeDraft {
    /// Build a draft from edit-form text, splitting each delimited field
    /// and trimming the pieces.
    pub fn from_form(author_id: &str, form: &RecipeFormText) -> Self {
        Self {
            author_id: author_id.to_string(),
            title: form.title.trim().to_string(),
            image: form.image.trim().to_string(),
            cuisine_type: form.cuisine_type.trim().to_string(),
            preparation_time: form.preparation_time,
            ingredients: split_trimmed(&form.ingredients, ','),
            instructions: split_trimmed(&form.instructions, '.'),
            categories: split_trimmed(&form.categories, ','),
        }
    }
}

/// Split on `delimiter`, trim each piece, drop empties (a trailing
/// period in instruction text would otherwise yield an empty step).
fn split_trimmed(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_recipe_accepts_prep_time_variants() {
        let a: RawRecipe =
            serde_json::from_str(r#"{"_id":"r1","title":"Pasta","prepTime":25}"#).unwrap();
        let b: RawRecipe =
            serde_json::from_str(r#"{"id":"r1","title":"Pasta","preparationTime":25}"#).unwrap();

        assert_eq!(a.into_canonical().preparation_time, 25);
        assert_eq!(b.into_canonical().preparation_time, 25);
    }

    #[test]
    fn raw_recipe_normalizes_author_forms() {
        let bare: RawRecipe =
            serde_json::from_str(r#"{"_id":"r1","userId":"u9"}"#).unwrap();
        let embedded: RawRecipe =
            serde_json::from_str(r#"{"_id":"r1","userId":{"_id":"u9","name":"Ana"}}"#).unwrap();

        assert_eq!(bare.into_canonical().author_id, "u9");
        assert_eq!(embedded.into_canonical().author_id, "u9");
    }

    #[test]
    fn like_ref_key_is_identical_for_both_forms() {
        let bare = LikeRef::Id(" u1 ".to_string());
        let embedded = LikeRef::User(LinkedUser {
            id: "u1".to_string(),
        });

        assert_eq!(bare.key(), "u1");
        assert_eq!(bare.key(), embedded.key());
    }

    #[test]
    fn display_status_requires_both_content_lists() {
        let mut recipe = RawRecipe {
            id: "r1".to_string(),
            title: "Soup".to_string(),
            image: String::new(),
            cuisine_type: String::new(),
            preparation_time: 0,
            ingredients: vec!["water".to_string()],
            instructions: vec!["boil".to_string()],
            categories: vec![],
            likes: vec![],
            author: None,
            created_at: String::new(),
            updated_at: String::new(),
            views: None,
        }
        .into_canonical();

        assert_eq!(recipe.display_status(), RecipeStatus::Published);

        recipe.instructions.clear();
        assert_eq!(recipe.display_status(), RecipeStatus::Draft);
    }

    #[test]
    fn is_recent_uses_a_seven_day_window() {
        let now = DateTime::parse_from_rfc3339("2024-05-08T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let mut recipe: Recipe = serde_json::from_str::<RawRecipe>(
            r#"{"_id":"r1","createdAt":"2024-05-05T10:00:00Z"}"#,
        )
        .unwrap()
        .into_canonical();
        assert!(recipe.is_recent(now));

        recipe.created_at = "2024-04-01T10:00:00Z".to_string();
        assert!(!recipe.is_recent(now));

        // Unparseable timestamps are simply not recent
        recipe.created_at = String::new();
        assert!(!recipe.is_recent(now));
    }

    #[test]
    fn draft_from_form_splits_and_trims() {
        let form = RecipeFormText {
            title: " Tacos ".to_string(),
            image: "https://img.example/t.png".to_string(),
            cuisine_type: "Mexican".to_string(),
            preparation_time: 20,
            ingredients: "tortillas, beef , salsa".to_string(),
            instructions: "Warm tortillas. Cook beef. Assemble.".to_string(),
            categories: "Dinner,Quick & Easy".to_string(),
        };

        let draft = RecipeDraft::from_form("u1", &form);

        assert_eq!(draft.title, "Tacos");
        assert_eq!(draft.ingredients, vec!["tortillas", "beef", "salsa"]);
        assert_eq!(
            draft.instructions,
            vec!["Warm tortillas", "Cook beef", "Assemble"]
        );
        assert_eq!(draft.categories, vec!["Dinner", "Quick & Easy"]);
    }
}
