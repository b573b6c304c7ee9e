// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod recipe;
pub mod summary;
pub mod user;

pub use recipe::{
    AuthorRef, LikeRef, LinkedUser, RawRecipe, Recipe, RecipeDraft, RecipeFormText, RecipeStatus,
};
pub use summary::AuthorSummary;
pub use user::{AuthType, NewUser, RawUser, User};
