//! # Label Mapper
//!
//! Translates object-detector class labels into canonical ingredient names through
//! a fixed lookup table. Classes outside the table are ignored: a detection the
//! table does not know about never reaches the ingredient set.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use log::{debug, info, trace};
use std::collections::HashMap;
use std::path::Path;

use crate::normalizer::canonicalize;
use crate::recipe_model::PredictionLabel;

/// Default minimum confidence for a prediction to be considered
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.4;

lazy_static! {
    /// Detector class -> ingredients it implies, in table order
    static ref CLASS_MAP: HashMap<&'static str, &'static [&'static str]> = {
        let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();

        // Whole produce
        map.insert("banana", &["banana"]);
        map.insert("apple", &["apple"]);
        map.insert("orange", &["orange"]);
        map.insert("broccoli", &["broccoli"]);
        map.insert("carrot", &["carrot"]);

        // Prepared foods imply their main components
        map.insert("sandwich", &["bread", "cheese", "ham"]);
        map.insert("hot dog", &["sausage", "bread"]);
        map.insert("pizza", &["flour", "tomato", "cheese"]);
        map.insert("donut", &["flour", "sugar"]);
        map.insert("cake", &["flour", "sugar", "egg"]);

        map
    };
}

/// Ingredients implied by a detector class, if the class is known
///
/// The class label is canonicalized before lookup.
pub fn ingredients_for_class(class: &str) -> Option<&'static [&'static str]> {
    CLASS_MAP.get(canonicalize(class).as_str()).copied()
}

/// Map predictions to canonical ingredient names
///
/// Predictions scoring strictly below `confidence_threshold` are skipped. Known
/// classes contribute all their mapped ingredients in table order; unknown classes
/// contribute nothing. The output is not deduplicated; pass it through
/// [`crate::normalizer::unique`].
///
/// # Examples
///
/// ```rust
/// use fridge_recipes::label_mapper::map_predictions;
/// use fridge_recipes::recipe_model::PredictionLabel;
///
/// let predictions = vec![PredictionLabel::new("sandwich", 0.5)];
/// assert_eq!(map_predictions(&predictions, 0.4), vec!["bread", "cheese", "ham"]);
/// ```
pub fn map_predictions(predictions: &[PredictionLabel], confidence_threshold: f32) -> Vec<String> {
    let mut ingredients = Vec::new();

    for prediction in predictions {
        let confidence = prediction.confidence();
        if confidence < confidence_threshold {
            trace!(
                "Skipping low-confidence prediction '{}' ({:.2} < {:.2})",
                prediction.class,
                confidence,
                confidence_threshold
            );
            continue;
        }

        match ingredients_for_class(&prediction.class) {
            Some(mapped) => {
                debug!("Prediction '{}' maps to {:?}", prediction.class, mapped);
                ingredients.extend(mapped.iter().map(|name| name.to_string()));
            }
            None => {
                debug!("Ignoring unknown detector class '{}'", prediction.class);
            }
        }
    }

    ingredients
}

/// Read a JSON array of `{class, score}` predictions from disk
pub fn load_predictions(path: &Path) -> Result<Vec<PredictionLabel>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read predictions file {}", path.display()))?;
    let predictions: Vec<PredictionLabel> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid predictions JSON in {}", path.display()))?;
    info!(
        "Loaded {} predictions from {}",
        predictions.len(),
        path.display()
    );
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_confidence_filter_is_per_item() {
        let predictions = vec![
            PredictionLabel::new("banana", 0.9),
            PredictionLabel::new("banana", 0.1),
        ];
        assert_eq!(map_predictions(&predictions, 0.4), vec!["banana"]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let predictions = vec![PredictionLabel::new("apple", 0.4)];
        assert_eq!(map_predictions(&predictions, 0.4), vec!["apple"]);
    }

    #[test]
    fn test_class_expands_in_table_order() {
        let predictions = vec![PredictionLabel::new("sandwich", 0.5)];
        assert_eq!(
            map_predictions(&predictions, DEFAULT_CONFIDENCE_THRESHOLD),
            vec!["bread", "cheese", "ham"]
        );
    }

    #[test]
    fn test_unknown_classes_ignored() {
        let predictions = vec![
            PredictionLabel::new("toaster", 0.99),
            PredictionLabel::new("carrot", 0.8),
        ];
        assert_eq!(map_predictions(&predictions, 0.4), vec!["carrot"]);
    }

    #[test]
    fn test_class_label_is_canonicalized() {
        let predictions = vec![PredictionLabel::new("Hot Dog!", 0.7)];
        assert_eq!(map_predictions(&predictions, 0.4), vec!["sausage", "bread"]);
    }

    #[test]
    fn test_missing_score_only_passes_zero_threshold() {
        let predictions = vec![PredictionLabel {
            class: "orange".to_string(),
            score: None,
        }];
        assert!(map_predictions(&predictions, 0.4).is_empty());
        assert_eq!(map_predictions(&predictions, 0.0), vec!["orange"]);
    }

    #[test]
    fn test_output_is_not_deduplicated() {
        let predictions = vec![
            PredictionLabel::new("pizza", 0.9),
            PredictionLabel::new("sandwich", 0.9),
        ];
        let mapped = map_predictions(&predictions, 0.4);
        assert_eq!(mapped.iter().filter(|name| *name == "cheese").count(), 2);
    }

    #[test]
    fn test_load_predictions_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"class": "banana", "score": 0.92}}, {{"class": "cake"}}]"#
        )?;

        let predictions = load_predictions(file.path())?;
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0], PredictionLabel::new("banana", 0.92));
        assert_eq!(predictions[1].score, None);
        Ok(())
    }

    #[test]
    fn test_load_predictions_rejects_bad_json() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "not json")?;
        assert!(load_predictions(file.path()).is_err());
        Ok(())
    }
}
