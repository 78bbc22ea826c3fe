//! Plain-file Cocktail Recipes
//!
//! Recipes are JSON documents stored one per file in a directory, served over
//! a small HTTP API.

pub mod domain;
pub use domain::{Config, Ingredient, IngredientEntry, NewRecipe, Recipe, Term};

/// Filesystem storage for recipes.
pub mod storage;
pub use storage::{Directory, StoreError};

/// The HTTP API.
pub mod api;
pub use api::{AppState, router};
