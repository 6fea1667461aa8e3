//! # Recipe Matching Pipeline
//!
//! Runs one recipe search for a user action:
//!
//! 1. candidate ids per available ingredient (fan-out, joined)
//! 2. full records per candidate (fan-out, joined) and assembly
//! 3. ranking by overlap, stable under ties
//! 4. missing ingredients of the selected recipe
//!
//! ```rust
//! use fridge_recipes::fake_source::FakeRecipeSource;
//! use fridge_recipes::normalizer::unique;
//! use fridge_recipes::pipeline::RecipeFinder;
//! use fridge_recipes::recipe_config::MatchingConfig;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let source = FakeRecipeSource::new()
//!     .with_ingredient("egg", &["1"])
//!     .with_recipe("1", "Omelette", &["Egg", "Butter"]);
//! let finder = RecipeFinder::new(source, MatchingConfig::default());
//!
//! let found = finder.find_recipe(&unique(["Egg"])).await.unwrap();
//! assert_eq!(found.recipe.title, "Omelette");
//! assert_eq!(found.missing[0].name, "Butter");
//! # }
//! ```

use log::info;

use crate::candidate_aggregator::{fetch_recipes, find_candidate_ids};
use crate::label_mapper::map_predictions;
use crate::missing::compute_missing;
use crate::normalizer::{unique, IngredientSet};
use crate::ranker::rank_scored;
use crate::recipe_config::MatchingConfig;
use crate::recipe_errors::RecipeError;
use crate::recipe_model::{PredictionLabel, Recipe, RecipeIngredient};
use crate::recipe_source::RecipeSource;

/// Outcome of one recipe search
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeMatch {
    /// The selected (highest-scoring) recipe
    pub recipe: Recipe,
    /// Its overlap score
    pub score: usize,
    /// Its ingredients not in the available set, in recipe order
    pub missing: Vec<RecipeIngredient>,
    /// Titles of all ranked candidates, best first
    pub ranked_titles: Vec<String>,
}

/// Canonical ingredient set from free-text names
///
/// Entries are trimmed; blank and degenerate entries are dropped.
pub fn ingredients_from_text<I, S>(names: I) -> IngredientSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    unique(names)
}

/// Canonical ingredient set from detector predictions
pub fn ingredients_from_predictions(
    predictions: &[PredictionLabel],
    config: &MatchingConfig,
) -> IngredientSet {
    unique(map_predictions(predictions, config.confidence_threshold))
}

/// Recipe search over a recipe source
pub struct RecipeFinder<S> {
    source: S,
    config: MatchingConfig,
}

impl<S: RecipeSource> RecipeFinder<S> {
    pub fn new(source: S, config: MatchingConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Best recipe for the available ingredients plus what is missing for it
    ///
    /// # Errors
    ///
    /// - [`RecipeError::Validation`] when `available` is empty
    /// - [`RecipeError::NoCandidates`] when no ingredient query returned a recipe
    /// - [`RecipeError::NoRecipe`] when no candidate could be loaded
    pub async fn find_recipe(&self, available: &IngredientSet) -> Result<RecipeMatch, RecipeError> {
        if available.is_empty() {
            return Err(RecipeError::Validation(
                "no ingredients supplied to search".to_string(),
            ));
        }

        info!(
            "Searching recipes for {} ingredients: {}",
            available.len(),
            available.iter().collect::<Vec<_>>().join(", ")
        );

        let ids = find_candidate_ids(
            &self.source,
            available,
            self.config.max_ingredients_queried,
            self.config.max_candidates,
        )
        .await?;
        let recipes = fetch_recipes(&self.source, &ids).await?;
        let ranked = rank_scored(recipes, available)?;

        let ranked_titles = ranked.iter().map(|entry| entry.recipe.title.clone()).collect();
        let best = ranked
            .into_iter()
            .next()
            .ok_or_else(|| RecipeError::NoRecipe("no recipes to rank".to_string()))?;
        let missing = compute_missing(&best.recipe, available);

        info!(
            "Recipe ready: '{}' (score {}, {} missing)",
            best.recipe.title,
            best.score,
            missing.len()
        );

        Ok(RecipeMatch {
            recipe: best.recipe,
            score: best.score,
            missing,
            ranked_titles,
        })
    }
}
