// SPDX-License-Identifier: MIT

//! In-memory recipe collection: snapshot storage and query evaluation.
//!
//! The collection holds a snapshot of recipes as of the last successful
//! fetch and answers filtered/paginated queries against it without
//! touching the network. The remote API stays authoritative; after any
//! mutation the owning controller replaces entries wholesale from a
//! fresh read instead of merging local edits.

use crate::models::{LikeRef, Recipe};

/// A browse query: free-text title search plus a cuisine filter.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub text: String,
    pub category: CategoryFilter,
}

impl RecipeQuery {
    pub fn new(text: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Cuisine filter selection. `All` matches every recipe; `Cuisine`
/// matches `cuisine_type` exactly (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Cuisine(String),
}

impl CategoryFilter {
    /// Interpret a filter-dropdown selection: the literal `"All"`
    /// disables the cuisine match.
    pub fn from_selection(value: &str) -> Self {
        if value == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Cuisine(value.to_string())
        }
    }

    fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Cuisine(cuisine) => recipe.cuisine_type == *cuisine,
        }
    }
}

/// Like-state of one recipe as seen by one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub like_count: usize,
    pub viewer_has_liked: bool,
}

/// Snapshot of recipes sourced from the remote API.
#[derive(Debug, Clone, Default)]
pub struct RecipeCollection {
    recipes: Vec<Recipe>,
}

impl RecipeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire snapshot.
    ///
    /// Precondition (not enforced): identifiers are unique. Duplicates
    /// are representable but violate the model invariant.
    pub fn load(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// The snapshot in fetch order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// Replace one entry wholesale with a freshly fetched copy,
    /// preserving its snapshot position; appends when the id is new.
    pub fn upsert(&mut self, recipe: Recipe) -> bool {
        match self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(slot) => {
                *slot = recipe;
                true
            }
            None => {
                self.recipes.push(recipe);
                false
            }
        }
    }

    /// Evaluate a browse query against the snapshot.
    ///
    /// A recipe matches when its title contains the query text as a
    /// case-insensitive substring (empty text matches all) and the
    /// cuisine filter accepts it. Snapshot order is preserved; an empty
    /// result is not an error.
    pub fn filter(&self, query: &RecipeQuery) -> Vec<&Recipe> {
        let needle = query.text.to_lowercase();
        self.recipes
            .iter()
            .filter(|recipe| {
                recipe.title.to_lowercase().contains(&needle) && query.category.matches(recipe)
            })
            .collect()
    }

    /// Dashboard-table search: matches the title or any ingredient,
    /// case-insensitively.
    pub fn search_with_ingredients(&self, text: &str) -> Vec<&Recipe> {
        let needle = text.to_lowercase();
        self.recipes
            .iter()
            .filter(|recipe| {
                recipe.title.to_lowercase().contains(&needle)
                    || recipe
                        .ingredients
                        .iter()
                        .any(|ingredient| ingredient.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// 1-based pagination: the slice `[(page-1)*page_size, page*page_size)`
/// clipped to the available length. Pages past the end (and page 0,
/// which has no slice) come back empty rather than as an error.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Vec<T> {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
    else {
        return Vec::new();
    };
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// Like-state of `recipe` as seen by `viewer_id`.
///
/// Membership compares normalized like-reference keys, so bare-string
/// and embedded-object references behave identically. A missing viewer
/// never matches.
pub fn derive_like_state(recipe: &Recipe, viewer_id: Option<&str>) -> LikeState {
    let viewer_has_liked = viewer_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .is_some_and(|id| recipe.liked_by.iter().any(|like| like.key() == id));

    LikeState {
        like_count: recipe.liked_by.len(),
        viewer_has_liked,
    }
}

/// Pure like toggle: a copy of `recipe` with `viewer_id` removed from
/// the like set if present, added otherwise. Never touches the network;
/// the caller reconciles with the authoritative state after the
/// corresponding API call resolves.
pub fn apply_like_toggle(recipe: &Recipe, viewer_id: &str) -> Recipe {
    let viewer = viewer_id.trim();
    let mut updated = recipe.clone();
    if updated.liked_by.iter().any(|like| like.key() == viewer) {
        updated.liked_by.retain(|like| like.key() != viewer);
    } else {
        updated.liked_by.push(LikeRef::Id(viewer.to_string()));
    }
    updated
}
