//! # Pipeline Demo
//!
//! Runs the full matching pipeline against an in-memory recipe source: detector
//! predictions are mapped to ingredients, candidate recipes are ranked, and the
//! missing ingredients of the best one are printed as a shopping list.

use fridge_recipes::fake_source::FakeRecipeSource;
use fridge_recipes::pipeline::{ingredients_from_predictions, ingredients_from_text, RecipeFinder};
use fridge_recipes::recipe_config::MatchingConfig;
use fridge_recipes::recipe_model::{PredictionLabel, RawRecipeRecord};
use fridge_recipes::shopping_list::{ShoppingListSink, TextListSink};

fn demo_source() -> FakeRecipeSource {
    FakeRecipeSource::new()
        .with_ingredient("bread", &["52772", "52960"])
        .with_ingredient("cheese", &["52960"])
        .with_ingredient("egg", &["52772", "53000"])
        .with_record(
            "52772",
            RawRecipeRecord::new()
                .with_field("strMeal", "French Toast")
                .with_field("strInstructions", "Whisk eggs and milk.\r\n\r\nSoak the bread.\r\nFry until golden.")
                .with_field("strIngredient1", "Bread")
                .with_field("strMeasure1", "4 slices")
                .with_field("strIngredient2", "Eggs")
                .with_field("strMeasure2", "2")
                .with_field("strIngredient3", "Milk")
                .with_field("strMeasure3", "100ml")
                .with_field("strSource", "https://example.test/french-toast"),
        )
        .with_record(
            "52960",
            RawRecipeRecord::new()
                .with_field("strMeal", "Croque Monsieur")
                .with_field("strInstructions", "Assemble.\nGrill.")
                .with_field("strIngredient1", "Bread")
                .with_field("strMeasure1", "2 slices")
                .with_field("strIngredient2", "Ham")
                .with_field("strMeasure2", "1 slice")
                .with_field("strIngredient3", "Cheese (gruyère)")
                .with_field("strMeasure3", "40g")
                .with_field("strIngredient4", "Butter")
                .with_field("strMeasure4", "1 tbsp"),
        )
        .with_recipe("53000", "Boiled Egg", &["Egg", "Salt"])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🍳 Fridge Recipe Demo");
    println!("=====================\n");

    let config = MatchingConfig::default();

    // Example 1: detector predictions
    println!("📷 Example 1: From detector predictions");
    println!("---------------------------------------");
    let predictions = vec![
        PredictionLabel::new("sandwich", 0.83),
        PredictionLabel::new("banana", 0.21),
        PredictionLabel::new("refrigerator", 0.97),
    ];
    let available = ingredients_from_predictions(&predictions, &config);
    println!(
        "Detected: {}\n",
        available.iter().collect::<Vec<_>>().join(", ")
    );

    let finder = RecipeFinder::new(demo_source(), config.clone());
    let found = finder.find_recipe(&available).await?;
    println!("{}\n", found.recipe);
    println!("Score: {}  (ranking: {})", found.score, found.ranked_titles.join(" > "));
    println!("\n🛒 Missing:");
    TextListSink::new(std::io::stdout()).deliver(&found.missing)?;

    // Example 2: typed ingredient names
    println!("\n⌨️  Example 2: From typed ingredients");
    println!("-----------------------------------");
    let available = ingredients_from_text(["Eggs?", "  bread ", "Milk (semi-skimmed)"]);
    println!(
        "Normalized: {}\n",
        available.iter().collect::<Vec<_>>().join(", ")
    );

    let finder = RecipeFinder::new(demo_source(), config);
    match finder.find_recipe(&available).await {
        Ok(found) => {
            println!("Selected: {} (score {})", found.recipe.title, found.score);
            for item in &found.missing {
                println!("  missing: {item}");
            }
        }
        Err(e) => println!("No recipe: {e}"),
    }

    Ok(())
}
