use anyhow::Result;
use chrono::Local;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use fridge_recipes::label_mapper::{load_predictions, map_predictions};
use fridge_recipes::localization::{init_localization, t, t_args};
use fridge_recipes::normalizer::unique;
use fridge_recipes::pipeline::RecipeFinder;
use fridge_recipes::recipe_config::MatchingConfig;
use fridge_recipes::recipe_errors::RecipeError;
use fridge_recipes::recipe_source::MealDbClient;
use fridge_recipes::shopping_list::{ShoppingListSink, TextListSink};

/// Find a recipe for what is in your fridge and list what is missing
#[derive(Parser, Debug)]
#[command(name = "fridge-recipes", version)]
#[command(about = "Find a recipe for what is in your fridge", long_about = None)]
struct Cli {
    /// JSON file of detector predictions (`[{"class": ..., "score": ...}]`)
    #[arg(short, long)]
    predictions: Option<PathBuf>,

    /// Ingredient names
    ingredients: Vec<String>,
}

fn status(message: &str) {
    println!("{}  {}", Local::now().format("%H:%M:%S"), message);
}

fn detected_status(names: &[&str]) -> String {
    if names.is_empty() {
        return t("status-detected-none");
    }
    t_args(
        "status-detected",
        &[
            ("count", names.len().to_string().as_str()),
            ("ingredients", names.join(", ").as_str()),
        ],
    )
}

fn render_error(e: &RecipeError) -> String {
    match e {
        RecipeError::ExternalFetch(inner) => {
            t_args(e.message_key(), &[("msg", inner.to_string().as_str())])
        }
        _ => t(e.message_key()),
    }
}

async fn run(input: Cli, config: MatchingConfig) -> Result<bool> {
    let mut raw_names = input.ingredients;
    if let Some(path) = &input.predictions {
        let predictions = load_predictions(path)?;
        raw_names.extend(map_predictions(&predictions, config.confidence_threshold));
    }

    let available = unique(raw_names.iter().filter(|name| !name.is_empty()));
    let names: Vec<&str> = available.iter().collect();
    status(&detected_status(&names));

    let client = MealDbClient::new(config.fetch.clone())?;
    let finder = RecipeFinder::new(client, config);

    status(&t_args("status-searching", &[("count", available.len().to_string().as_str())]));
    let found = match finder.find_recipe(&available).await {
        Ok(found) => found,
        Err(e) => {
            error!("Recipe search failed: {e}");
            status(&render_error(&e));
            return Ok(false);
        }
    };

    status(&t_args("status-recipe-ready", &[("title", found.recipe.title.as_str())]));
    println!();
    println!("== {} ==", t("heading-recipe"));
    println!("{}", found.recipe);
    println!();
    status(&t_args("status-score", &[("score", found.score.to_string().as_str())]));

    if found.missing.is_empty() {
        status(&t("status-nothing-missing"));
        return Ok(true);
    }

    status(&t_args(
        "status-missing-count",
        &[("count", found.missing.len().to_string().as_str())],
    ));
    println!();
    println!("== {} ==", t("heading-shopping-list"));
    let mut sink = TextListSink::new(std::io::stdout().lock());
    sink.deliver(&found.missing)?;

    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting fridge recipe finder");

    init_localization()?;
    let config = MatchingConfig::from_env();

    let input = Cli::parse();

    match run(input, config).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Fatal error: {e:?}");
            eprintln!("{}", t_args("error-generic", &[("msg", e.to_string().as_str())]));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_collects_ingredients_and_predictions() {
        let cli = Cli::try_parse_from(["fridge-recipes", "-p", "detections.json", "egg", "Olive Oil"])
            .unwrap();
        assert_eq!(cli.predictions, Some(PathBuf::from("detections.json")));
        assert_eq!(cli.ingredients, vec!["egg", "Olive Oil"]);
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        let result = Cli::try_parse_from(["fridge-recipes", "--verbose", "egg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_is_not_a_parse_failure() {
        let err = Cli::try_parse_from(["fridge-recipes", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_detected_status_with_no_ingredients() {
        init_localization().unwrap();
        let none = detected_status(&[]);
        assert!(!none.starts_with("Missing translation"));
        assert!(!none.trim_end().ends_with(':'));

        let some = detected_status(&["egg", "bread"]);
        assert!(some.contains("egg, bread"));
    }
}
