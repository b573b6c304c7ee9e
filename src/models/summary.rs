// SPDX-License-Identifier: MIT

//! Per-author aggregates for the dashboard stat cards.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Recipe;

/// Aggregate counts for one author's recipes, as reported by the
/// summary endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthorSummary {
    #[serde(default)]
    pub total_recipes: u32,
    #[serde(default)]
    pub total_likes: u32,
    #[serde(default)]
    pub total_views: u32,
}

impl AuthorSummary {
    /// Compute the same aggregates locally from a recipe set. Matches
    /// what the summary endpoint reports for those recipes.
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        let mut summary = Self::default();
        for recipe in recipes {
            summary.total_recipes += 1;
            summary.total_likes += recipe.liked_by.len() as u32;
            summary.total_views += recipe.views.unwrap_or(0);
        }
        summary
    }
}
