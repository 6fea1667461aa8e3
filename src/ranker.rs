//! # Ranker
//!
//! Scores recipes by ingredient overlap against the available set and orders them
//! best-first. Ties keep the order the recipes arrived in.

use log::{debug, info};
use std::cmp::Reverse;

use crate::normalizer::{canonicalize, IngredientSet};
use crate::recipe_errors::RecipeError;
use crate::recipe_model::Recipe;

/// A recipe together with its overlap score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecipe {
    pub recipe: Recipe,
    pub score: usize,
}

/// Number of ingredient lines whose canonical name is available
///
/// Repeated ingredient lines each count.
pub fn score(recipe: &Recipe, available: &IngredientSet) -> usize {
    recipe
        .ingredients
        .iter()
        .filter(|ingredient| available.contains(&canonicalize(&ingredient.name)))
        .count()
}

/// Score and sort recipes by descending score, stable under ties
///
/// Fails with [`RecipeError::NoRecipe`] when `recipes` is empty.
pub fn rank_scored(
    recipes: Vec<Recipe>,
    available: &IngredientSet,
) -> Result<Vec<ScoredRecipe>, RecipeError> {
    if recipes.is_empty() {
        return Err(RecipeError::NoRecipe("no recipes to rank".to_string()));
    }

    let mut scored: Vec<ScoredRecipe> = recipes
        .into_iter()
        .map(|recipe| {
            let score = score(&recipe, available);
            debug!("Recipe '{}' scored {}", recipe.title, score);
            ScoredRecipe { recipe, score }
        })
        .collect();

    // Vec::sort_by_key is a stable sort
    scored.sort_by_key(|entry| Reverse(entry.score));

    info!(
        "Ranked {} recipes, best '{}' with score {}",
        scored.len(),
        scored[0].recipe.title,
        scored[0].score
    );
    Ok(scored)
}

/// Recipes ordered best-first
pub fn rank(recipes: Vec<Recipe>, available: &IngredientSet) -> Result<Vec<Recipe>, RecipeError> {
    Ok(rank_scored(recipes, available)?
        .into_iter()
        .map(|entry| entry.recipe)
        .collect())
}

/// The highest-scored recipe
pub fn select_best(
    recipes: Vec<Recipe>,
    available: &IngredientSet,
) -> Result<ScoredRecipe, RecipeError> {
    rank_scored(recipes, available)?
        .into_iter()
        .next()
        .ok_or_else(|| RecipeError::NoRecipe("no recipes to rank".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::unique;
    use crate::recipe_model::RecipeIngredient;

    fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
        ingredients.iter().fold(Recipe::new(title), |r, name| {
            r.with_ingredient(RecipeIngredient::new(name, ""))
        })
    }

    #[test]
    fn test_score_counts_canonical_matches() {
        let available = unique(["egg", "olive oil"]);
        let r = recipe("Fried Egg", &["Egg", "Olive Oil (extra virgin)", "Salt"]);
        assert_eq!(score(&r, &available), 2);
    }

    #[test]
    fn test_score_counts_duplicate_lines() {
        let available = unique(["egg"]);
        let r = recipe("Double Egg", &["egg", "Egg"]);
        assert_eq!(score(&r, &available), 2);
    }

    #[test]
    fn test_blank_names_never_score() {
        let available = unique(["egg"]);
        let r = recipe("Odd", &["???", ""]);
        assert_eq!(score(&r, &available), 0);
    }

    #[test]
    fn test_rank_is_stable_under_ties() {
        let available = unique(["egg", "bread"]);
        let a = recipe("A", &["egg", "bread"]);
        let b = recipe("B", &["bread", "egg", "milk"]);
        let c = recipe("C", &["egg"]);

        let ranked = rank(vec![c.clone(), a.clone(), b.clone()], &available).unwrap();
        let titles: Vec<_> = ranked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);

        let ranked = rank(vec![b, a, c], &available).unwrap();
        let titles: Vec<_> = ranked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_rank_empty_is_no_recipe() {
        let available = unique(["egg"]);
        assert!(matches!(
            rank(Vec::new(), &available),
            Err(RecipeError::NoRecipe(_))
        ));
        assert!(matches!(
            select_best(Vec::new(), &available),
            Err(RecipeError::NoRecipe(_))
        ));
    }

    #[test]
    fn test_select_best_reports_score() {
        let available = unique(["egg", "bread", "cheese"]);
        let r1 = recipe("R1", &["egg", "bread", "milk"]);
        let r2 = recipe("R2", &["egg", "bread", "cheese", "ham"]);

        let best = select_best(vec![r1, r2], &available).unwrap();
        assert_eq!(best.recipe.title, "R2");
        assert_eq!(best.score, 3);
    }
}
