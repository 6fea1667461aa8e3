//! # Recipe Data Model
//!
//! Data structures shared by the matching pipeline: detector predictions, raw
//! records as delivered by a recipe source, and the assembled `Recipe`.
//!
//! ## Usage
//!
//! ```rust
//! use fridge_recipes::recipe_model::{Recipe, RecipeIngredient};
//!
//! let recipe = Recipe::new("Omelette")
//!     .with_ingredient(RecipeIngredient::new("Eggs", "3"))
//!     .with_ingredient(RecipeIngredient::new("Butter", ""))
//!     .with_instructions(vec!["Whisk the eggs.".to_string()]);
//!
//! assert_eq!(recipe.ingredients.len(), 2);
//! assert_eq!(recipe.servings, 2);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Servings used when the source provides no serving count
pub const DEFAULT_SERVINGS: u32 = 2;

/// Identifier of a recipe at the recipe source
pub type RecipeId = String;

/// A single detection from the object classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLabel {
    /// Raw detector class name (e.g. "banana", "hot dog")
    pub class: String,

    /// Confidence in [0, 1]; missing scores count as 0
    #[serde(default)]
    pub score: Option<f32>,
}

impl PredictionLabel {
    pub fn new(class: &str, score: f32) -> Self {
        Self {
            class: class.to_string(),
            score: Some(score),
        }
    }

    /// Confidence with a missing score treated as 0
    pub fn confidence(&self) -> f32 {
        self.score.unwrap_or(0.0)
    }
}

/// One ingredient line of a recipe
///
/// `name` is matched after canonicalization; `amount` is display-only and never
/// canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
}

impl RecipeIngredient {
    pub fn new(name: &str, amount: &str) -> Self {
        Self {
            name: name.to_string(),
            amount: amount.to_string(),
        }
    }

    pub fn has_amount(&self) -> bool {
        !self.amount.trim().is_empty()
    }
}

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_amount() {
            write!(f, "{} — {}", self.name, self.amount)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// An assembled recipe; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    /// Always at least 1
    pub servings: u32,
    /// Source order, significant for display
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub why_fit: String,
    pub source_url: Option<String>,
}

impl Recipe {
    /// Create a recipe with a title and default servings
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            servings: DEFAULT_SERVINGS,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            why_fit: String::new(),
            source_url: None,
        }
    }

    pub fn with_ingredient(mut self, ingredient: RecipeIngredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_why_fit(mut self, why_fit: &str) -> Self {
        self.why_fit = why_fit.to_string();
        self
    }

    pub fn with_source_url(mut self, url: &str) -> Self {
        self.source_url = Some(url.to_string());
        self
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (serves {})", self.title, self.servings)?;
        writeln!(f)?;
        for ingredient in &self.ingredients {
            writeln!(f, "  • {ingredient}")?;
        }
        if !self.instructions.is_empty() {
            writeln!(f)?;
            for (i, step) in self.instructions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, step)?;
            }
        }
        if !self.why_fit.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.why_fit)?;
        }
        if let Some(url) = &self.source_url {
            write!(f, "{url}")?;
        }
        Ok(())
    }
}

/// A recipe record exactly as the source delivered it
///
/// Fields are looked up by name; values that are `null`, non-strings or blank are
/// reported as absent by [`RawRecipeRecord::text`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecipeRecord {
    fields: Map<String, Value>,
}

impl RawRecipeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used by fakes and tests
    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Trimmed, non-blank string value of a field
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Untrimmed string value of a field, blank allowed
    pub fn raw_text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for RawRecipeRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
