//! # Candidate Aggregator
//!
//! Fans out one recipe-source query per ingredient, joins all of them, and merges
//! the results in ingredient order. Individual failures are logged and contribute
//! nothing; only an empty overall result is an error.
//!
//! The detail-fetch stage works the same way: one lookup per candidate id, joined,
//! merged in id order, with unusable records dropped.

use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::normalizer::IngredientSet;
use crate::recipe_assembler::assemble;
use crate::recipe_errors::RecipeError;
use crate::recipe_model::{Recipe, RecipeId};
use crate::recipe_source::RecipeSource;

/// Candidate recipe ids for the available ingredients
///
/// Queries at most `max_ingredients_queried` ingredients (the first ones in set
/// order), concurrently. Ids are deduplicated keeping first-seen order, then
/// truncated to `max_candidates`.
///
/// # Errors
///
/// - [`RecipeError::Validation`] if `ingredients` is empty
/// - [`RecipeError::NoCandidates`] if no lookup produced any id
pub async fn find_candidate_ids<S>(
    source: &S,
    ingredients: &IngredientSet,
    max_ingredients_queried: usize,
    max_candidates: usize,
) -> Result<Vec<RecipeId>, RecipeError>
where
    S: RecipeSource + ?Sized,
{
    if ingredients.is_empty() {
        return Err(RecipeError::Validation(
            "no ingredients supplied to search".to_string(),
        ));
    }

    let queried: Vec<&str> = ingredients.iter().take(max_ingredients_queried).collect();
    if queried.len() < ingredients.len() {
        debug!(
            "Querying {} of {} ingredients",
            queried.len(),
            ingredients.len()
        );
    }

    let lookups = queried
        .iter()
        .map(|ingredient| source.filter_by_ingredient(ingredient));
    let results = join_all(lookups).await;

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for (ingredient, result) in queried.iter().zip(results) {
        match result {
            Ok(found) => {
                debug!("Ingredient '{ingredient}' returned {} ids", found.len());
                for id in found {
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
            }
            Err(e) => {
                warn!("Candidate lookup for '{ingredient}' failed: {e}");
            }
        }
    }

    if ids.is_empty() {
        return Err(RecipeError::NoCandidates(format!(
            "no recipes use any of: {}",
            queried.join(", ")
        )));
    }

    let total = ids.len();
    ids.truncate(max_candidates);
    info!(
        "Found {} candidate recipes from {} ingredient queries, keeping {}",
        total,
        queried.len(),
        ids.len()
    );
    Ok(ids)
}

/// Fetch and assemble the full records of the candidate ids
///
/// Lookups run concurrently; results keep the order of `ids`. Failed lookups,
/// unknown ids and records that fail assembly are skipped.
///
/// # Errors
///
/// [`RecipeError::NoRecipe`] if no usable recipe remains.
pub async fn fetch_recipes<S>(source: &S, ids: &[RecipeId]) -> Result<Vec<Recipe>, RecipeError>
where
    S: RecipeSource + ?Sized,
{
    let results = join_all(ids.iter().map(|id| source.lookup_by_id(id))).await;

    let mut recipes = Vec::with_capacity(ids.len());
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(Some(record)) => match assemble(&record) {
                Ok(recipe) => recipes.push(recipe),
                Err(e) => warn!("Skipping recipe {id}: {e}"),
            },
            Ok(None) => debug!("Recipe {id} not found at source"),
            Err(e) => warn!("Detail lookup for recipe {id} failed: {e}"),
        }
    }

    if recipes.is_empty() {
        return Err(RecipeError::NoRecipe(format!(
            "none of {} candidate recipes could be loaded",
            ids.len()
        )));
    }

    info!("Loaded {} of {} candidate recipes", recipes.len(), ids.len());
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_source::FakeRecipeSource;
    use crate::normalizer::unique;
    use crate::recipe_model::RawRecipeRecord;

    #[tokio::test]
    async fn test_empty_ingredients_rejected() {
        let source = FakeRecipeSource::new();
        let result = find_candidate_ids(&source, &IngredientSet::new(), 6, 20).await;
        assert!(matches!(result, Err(RecipeError::Validation(_))));
        assert_eq!(source.filter_calls(), 0);
    }

    #[tokio::test]
    async fn test_all_empty_lookups_is_no_candidates() {
        let source = FakeRecipeSource::new();
        let result = find_candidate_ids(&source, &unique(["egg", "ham"]), 6, 20).await;
        assert!(matches!(result, Err(RecipeError::NoCandidates(_))));
        assert_eq!(source.filter_calls(), 2);
    }

    #[tokio::test]
    async fn test_union_dedups_in_ingredient_order() {
        let source = FakeRecipeSource::new()
            .with_ingredient("egg", &["3", "1"])
            .with_ingredient("bread", &["1", "2"])
            .with_ingredient("ham", &["4"]);

        let ids = find_candidate_ids(&source, &unique(["egg", "bread", "ham"]), 6, 20)
            .await
            .unwrap();
        assert_eq!(ids, vec!["3", "1", "2", "4"]);
    }

    #[tokio::test]
    async fn test_caps_queries_and_candidates() {
        let source = FakeRecipeSource::new()
            .with_ingredient("a", &["1", "2"])
            .with_ingredient("b", &["3"])
            .with_ingredient("c", &["4"]);

        let ids = find_candidate_ids(&source, &unique(["a", "b", "c"]), 2, 2)
            .await
            .unwrap();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(source.filter_calls(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_tolerated() {
        let source = FakeRecipeSource::new()
            .failing_ingredient("egg")
            .with_ingredient("bread", &["7"]);

        let ids = find_candidate_ids(&source, &unique(["egg", "bread"]), 6, 20)
            .await
            .unwrap();
        assert_eq!(ids, vec!["7"]);
    }

    #[tokio::test]
    async fn test_total_failure_is_no_candidates() {
        let source = FakeRecipeSource::new()
            .failing_ingredient("egg")
            .failing_ingredient("bread");

        let result = find_candidate_ids(&source, &unique(["egg", "bread"]), 6, 20).await;
        assert!(matches!(result, Err(RecipeError::NoCandidates(_))));
    }

    #[tokio::test]
    async fn test_fetch_recipes_skips_unusable_records() {
        let source = FakeRecipeSource::new()
            .with_recipe("1", "Omelette", &["Eggs"])
            .with_record("2", RawRecipeRecord::new().with_field("strIngredient1", "Ham"))
            .with_recipe("3", "Toast", &["Bread"])
            .failing_id("4");

        let ids: Vec<RecipeId> = ["4", "3", "2", "1", "5"].iter().map(|s| s.to_string()).collect();
        let recipes = fetch_recipes(&source, &ids).await.unwrap();
        let titles: Vec<_> = recipes.iter().map(|r| r.title.as_str()).collect();

        assert_eq!(titles, vec!["Toast", "Omelette"]);
        assert_eq!(source.lookup_calls(), 5);
    }

    #[tokio::test]
    async fn test_fetch_recipes_nothing_usable() {
        let source = FakeRecipeSource::new().failing_id("1");
        let result = fetch_recipes(&source, &["1".to_string(), "2".to_string()]).await;
        assert!(matches!(result, Err(RecipeError::NoRecipe(_))));
    }
}
