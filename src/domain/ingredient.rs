use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single measured ingredient, as accepted when adding a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// The ingredient name, for example "White Rum".
    pub name: String,
    /// How much of the ingredient to use, in `unit`s.
    pub amount: f64,
    /// The unit `amount` is measured in, for example "ml".
    pub unit: String,
}

/// An ingredient as it appears in a stored recipe file.
///
/// Hand-curated files do not always follow the strict [`Ingredient`] shape.
/// Some list ingredients as bare strings, others use an `ingredient` key in
/// place of `name`. Both shapes are accepted on read and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    /// A bare ingredient name.
    Plain(String),
    /// A record carrying a `name` and/or an `ingredient` field.
    Structured(IngredientRecord),
}

/// The structured form of an [`IngredientEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientRecord {
    /// Preferred name field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fallback name field used by older files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<String>,
    /// Measured amount, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Unit of `amount`, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Any other fields found in the file, kept as they were.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IngredientEntry {
    /// The name of this ingredient.
    ///
    /// For structured entries `name` wins over `ingredient`. Empty strings
    /// count as absent, so an entry with neither yields `None` and is skipped
    /// by every ingredient query.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Plain(name) => non_empty(name),
            Self::Structured(record) => record
                .name
                .as_deref()
                .and_then(non_empty)
                .or_else(|| record.ingredient.as_deref().and_then(non_empty)),
        }
    }

    /// Whether the ingredient name contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name()
            .is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

impl From<Ingredient> for IngredientEntry {
    fn from(ingredient: Ingredient) -> Self {
        Self::Structured(IngredientRecord {
            name: Some(ingredient.name),
            ingredient: None,
            amount: Some(ingredient.amount),
            unit: Some(ingredient.unit),
            extra: Map::new(),
        })
    }
}
