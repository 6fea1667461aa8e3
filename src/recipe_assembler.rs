//! # Recipe Assembler
//!
//! Converts a raw recipe-source record into a [`Recipe`]. The record layout is the
//! TheMealDB one: `strMeal`, `strInstructions`, indexed `strIngredientN` /
//! `strMeasureN` pairs, `strSource` and `strYoutube`.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::recipe_errors::RecipeError;
use crate::recipe_model::{RawRecipeRecord, Recipe, RecipeIngredient};

/// Highest ingredient/measure index a record may carry
pub const MAX_INGREDIENT_FIELDS: usize = 20;

/// Rationale attached to every assembled recipe
pub const WHY_FIT: &str =
    "Picked from recipes that use your ingredients, ranked by how many of them it needs.";

const TITLE_FIELD: &str = "strMeal";
const INSTRUCTIONS_FIELD: &str = "strInstructions";
const SOURCE_FIELD: &str = "strSource";
const VIDEO_FIELD: &str = "strYoutube";

lazy_static! {
    static ref LINE_BREAKS_REGEX: Regex =
        Regex::new(r"(?:\r?\n|\r)+").expect("Line break pattern should be valid");
}

/// Assemble a recipe from a raw record
///
/// Fails with [`RecipeError::Assembly`] when the record has no title.
pub fn assemble(record: &RawRecipeRecord) -> Result<Recipe, RecipeError> {
    let title = record
        .text(TITLE_FIELD)
        .ok_or_else(|| RecipeError::Assembly(format!("record has no {TITLE_FIELD}")))?;

    let instructions = record
        .raw_text(INSTRUCTIONS_FIELD)
        .map(split_instructions)
        .unwrap_or_default();
    let recipe = extract_ingredients(record)
        .into_iter()
        .fold(Recipe::new(title), Recipe::with_ingredient)
        .with_instructions(instructions)
        .with_why_fit(WHY_FIT);
    let recipe = match record.text(SOURCE_FIELD).or_else(|| record.text(VIDEO_FIELD)) {
        Some(url) => recipe.with_source_url(url),
        None => recipe,
    };

    debug!(
        "Assembled recipe '{}' with {} ingredients and {} steps",
        recipe.title,
        recipe.ingredients.len(),
        recipe.instructions.len()
    );
    Ok(recipe)
}

/// Indexed ingredient/measure pairs, keeping only those with a non-blank name
fn extract_ingredients(record: &RawRecipeRecord) -> Vec<RecipeIngredient> {
    (1..=MAX_INGREDIENT_FIELDS)
        .filter_map(|index| {
            let name = record.text(&format!("strIngredient{index}"))?;
            let amount = record.text(&format!("strMeasure{index}")).unwrap_or("");
            trace!("Ingredient field {index}: '{name}' / '{amount}'");
            Some(RecipeIngredient::new(name, amount))
        })
        .collect()
}

/// Split instruction text on runs of line breaks into trimmed, non-blank steps
pub fn split_instructions(text: &str) -> Vec<String> {
    LINE_BREAKS_REGEX
        .split(text)
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::DEFAULT_SERVINGS;

    fn pancake_record() -> RawRecipeRecord {
        RawRecipeRecord::new()
            .with_field("idMeal", "52772")
            .with_field("strMeal", "Pancakes")
            .with_field("strInstructions", "Mix flour and eggs.\r\n\r\nAdd milk.\nFry.")
            .with_field("strIngredient1", "Flour")
            .with_field("strMeasure1", "100g")
            .with_field("strIngredient2", "Eggs")
            .with_field("strMeasure2", "2")
            .with_field("strIngredient3", " ")
            .with_field("strMeasure3", "1 pinch")
            .with_field("strIngredient4", "Milk")
            .with_field("strMeasure4", "")
            .with_field("strSource", "https://example.test/pancakes")
            .with_field("strYoutube", "https://video.example.test/pancakes")
    }

    #[test]
    fn test_assemble_full_record() {
        let recipe = assemble(&pancake_record()).unwrap();

        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.servings, DEFAULT_SERVINGS);
        assert_eq!(
            recipe.ingredients,
            vec![
                RecipeIngredient::new("Flour", "100g"),
                RecipeIngredient::new("Eggs", "2"),
                RecipeIngredient::new("Milk", ""),
            ]
        );
        assert_eq!(
            recipe.instructions,
            vec!["Mix flour and eggs.", "Add milk.", "Fry."]
        );
        assert_eq!(recipe.why_fit, WHY_FIT);
        assert_eq!(
            recipe.source_url.as_deref(),
            Some("https://example.test/pancakes")
        );
    }

    #[test]
    fn test_missing_title_is_assembly_error() {
        let record = RawRecipeRecord::new().with_field("strIngredient1", "Eggs");
        assert!(matches!(assemble(&record), Err(RecipeError::Assembly(_))));

        let blank = RawRecipeRecord::new().with_field("strMeal", "   ");
        assert!(matches!(assemble(&blank), Err(RecipeError::Assembly(_))));
    }

    #[test]
    fn test_source_url_falls_back_to_video() {
        let record = RawRecipeRecord::new()
            .with_field("strMeal", "Soup")
            .with_field("strSource", "")
            .with_field("strYoutube", "https://video.example.test/soup");
        let recipe = assemble(&record).unwrap();
        assert_eq!(
            recipe.source_url.as_deref(),
            Some("https://video.example.test/soup")
        );

        let bare = RawRecipeRecord::new().with_field("strMeal", "Soup");
        assert_eq!(assemble(&bare).unwrap().source_url, None);
    }

    #[test]
    fn test_ingredient_fields_beyond_limit_ignored() {
        let mut record = RawRecipeRecord::new().with_field("strMeal", "Big Stew");
        for index in 1..=21 {
            record = record.with_field(&format!("strIngredient{index}"), &format!("item {index}"));
        }
        let recipe = assemble(&record).unwrap();
        assert_eq!(recipe.ingredients.len(), MAX_INGREDIENT_FIELDS);
        assert_eq!(recipe.ingredients.last().unwrap().name, "item 20");
    }

    #[test]
    fn test_gaps_in_ingredient_indexes_preserve_order() {
        let record = RawRecipeRecord::new()
            .with_field("strMeal", "Salad")
            .with_field("strIngredient2", "Lettuce")
            .with_field("strIngredient5", "Tomato")
            .with_field("strMeasure5", "2");
        let names: Vec<_> = assemble(&record)
            .unwrap()
            .ingredients
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Lettuce", "Tomato"]);
    }

    #[test]
    fn test_split_instructions_line_break_conventions() {
        assert_eq!(
            split_instructions("Step one.\n\n\nStep two.\r\nStep three.\r\rStep four."),
            vec!["Step one.", "Step two.", "Step three.", "Step four."]
        );
        assert_eq!(split_instructions("  \n \n"), Vec::<String>::new());
        assert_eq!(split_instructions("Single step"), vec!["Single step"]);
    }
}
