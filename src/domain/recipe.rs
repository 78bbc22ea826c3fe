use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    ingredient::{Ingredient, IngredientEntry},
    query::Term,
};

/// The category given to recipes that don't specify one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A recipe submitted for addition to the store.
///
/// Unlike [`Recipe`], every ingredient must be a fully specified
/// [`Ingredient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    /// The recipe name. Also used as the file stem.
    pub name: String,
    /// Ingredients, in the order they should be listed.
    pub ingredients: Vec<Ingredient>,
    /// Preparation steps, in order.
    pub instructions: Vec<String>,
    /// The glass the drink is served in.
    pub glass_type: String,
    /// Free-form category, e.g. "Classic".
    #[serde(default = "default_category")]
    pub category: String,
}

/// A cocktail recipe as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// The recipe name, unique across the store.
    pub name: String,
    /// Ingredients, in either of the shapes found in stored files.
    pub ingredients: Vec<IngredientEntry>,
    /// Preparation steps, in order.
    #[serde(default)]
    pub instructions: Vec<String>,
    /// The glass the drink is served in.
    pub glass_type: String,
    /// Free-form category.
    #[serde(default = "default_category")]
    pub category: String,
    /// Fields present in the stored file that this model doesn't know about.
    ///
    /// These are carried through so that reading a recipe returns everything
    /// the file contains.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    /// Whether this recipe is called `name`.
    ///
    /// Names compare case-insensitively with surrounding whitespace ignored.
    /// This is the single policy used for lookups and for duplicate detection.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        normalise_name(&self.name) == normalise_name(name)
    }

    /// The names of this recipe's ingredients, skipping nameless entries.
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().filter_map(IngredientEntry::name)
    }

    /// Whether any ingredient name contains `term`, ignoring case.
    #[must_use]
    pub fn has_ingredient(&self, term: &Term) -> bool {
        self.ingredients
            .iter()
            .any(|ingredient| ingredient.matches(term.needle()))
    }

    /// Whether every one of `terms` is found among the ingredient names.
    #[must_use]
    pub fn has_all_ingredients(&self, terms: &[Term]) -> bool {
        terms.iter().all(|term| self.has_ingredient(term))
    }

    /// Whether the glass type contains `term`, ignoring case.
    #[must_use]
    pub fn matches_glass(&self, term: &Term) -> bool {
        self.glass_type.to_lowercase().contains(term.needle())
    }
}

impl From<NewRecipe> for Recipe {
    fn from(recipe: NewRecipe) -> Self {
        Self {
            name: recipe.name.trim().to_string(),
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            instructions: recipe.instructions,
            glass_type: recipe.glass_type,
            category: recipe.category,
            extra: Map::new(),
        }
    }
}

/// Normalises a recipe name for comparison.
#[must_use]
pub fn normalise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Checks that `name` can be used as the file stem of a recipe.
///
/// # Errors
///
/// Returns an error if the trimmed name is empty, starts with a `.`, or
/// contains a path separator or NUL byte.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.starts_with('.') {
        return Err(NameError::LeadingDot(name.to_string()));
    }
    if let Some(c) = name.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(NameError::InvalidCharacter {
            name: name.to_string(),
            character: c,
        });
    }
    Ok(())
}

/// The reasons a recipe name can't be stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name is empty or only whitespace.
    #[error("recipe name must not be empty")]
    Empty,
    /// The name would produce a hidden file.
    #[error("recipe name '{0}' must not start with '.'")]
    LeadingDot(String),
    /// The name contains a character that can't appear in a file stem.
    #[error("recipe name '{name}' contains invalid character {character:?}")]
    InvalidCharacter {
        /// The rejected name.
        name: String,
        /// The offending character.
        character: char,
    },
}
