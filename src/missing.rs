//! # Missing-Ingredient Calculator
//!
//! Computes which lines of a selected recipe are not covered by the available
//! ingredient set.

use log::info;

use crate::normalizer::{canonicalize, IngredientSet};
use crate::recipe_model::{Recipe, RecipeIngredient};

/// Recipe ingredients whose canonical name is not available, in recipe order
///
/// Lines whose name canonicalizes to an empty string are always reported: the
/// available set never contains the empty name.
pub fn compute_missing(recipe: &Recipe, available: &IngredientSet) -> Vec<RecipeIngredient> {
    let missing: Vec<RecipeIngredient> = recipe
        .ingredients
        .iter()
        .filter(|ingredient| !available.contains(&canonicalize(&ingredient.name)))
        .cloned()
        .collect();

    info!(
        "Recipe '{}' is missing {} of {} ingredients",
        recipe.title,
        missing.len(),
        recipe.ingredients.len()
    );
    missing
}
