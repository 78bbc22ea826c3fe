//! Domain models for the recipe collection.
//!
//! This module contains the recipe and ingredient types, the search term
//! type used by queries, and the server configuration.

/// Ingredient types, including the tolerant on-disk shape.
pub mod ingredient;
pub use ingredient::{Ingredient, IngredientEntry, IngredientRecord};

/// Recipe types and the predicates queries are built from.
pub mod recipe;
pub use recipe::{DEFAULT_CATEGORY, NameError, NewRecipe, Recipe};

mod config;
pub use config::Config;

/// Search terms.
pub mod query;
pub use query::{EmptyQuery, Term};
