//! # Recipe Matching Configuration Module
//!
//! This module defines configuration structures for the matching pipeline and the
//! recipe source transport, plus loading overrides from the environment.

use log::{debug, warn};
use std::env;
use std::str::FromStr;

use crate::label_mapper::DEFAULT_CONFIDENCE_THRESHOLD;

// Constants for matching configuration
pub const DEFAULT_MAX_INGREDIENTS_QUERIED: usize = 6;
pub const DEFAULT_MAX_CANDIDATES: usize = 20;
pub const DEFAULT_MAX_DETECTIONS: usize = 20;
pub const DEFAULT_RECIPE_API_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Transport and recovery settings for the recipe source
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the recipe API
    pub base_url: String,
    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,
    /// Maximum number of retry attempts after the first call
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RECIPE_API_URL.to_string(),
            request_timeout_secs: 10,
            max_retries: 2,
            base_retry_delay_ms: 250,
            max_retry_delay_ms: 2000,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Thresholds and caps for one matching run
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Minimum detector confidence, inclusive
    pub confidence_threshold: f32,
    /// Ingredients queried at the recipe source per search
    pub max_ingredients_queried: usize,
    /// Candidate recipes fetched in full per search
    pub max_candidates: usize,
    /// Detections requested from the classifier per image
    pub max_detections: usize,
    /// Recipe source transport settings
    pub fetch: FetchConfig,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_ingredients_queried: DEFAULT_MAX_INGREDIENTS_QUERIED,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_detections: DEFAULT_MAX_DETECTIONS,
            fetch: FetchConfig::default(),
        }
    }
}

impl MatchingConfig {
    /// Load the configuration, applying overrides from the environment
    ///
    /// Reads a `.env` file if present. Recognized variables:
    /// - `FRIDGE_CONFIDENCE_THRESHOLD`: float in [0, 1]
    /// - `FRIDGE_MAX_INGREDIENTS_QUERIED`: positive integer
    /// - `FRIDGE_MAX_CANDIDATES`: positive integer
    /// - `FRIDGE_MAX_DETECTIONS`: positive integer
    /// - `FRIDGE_RECIPE_API_URL`: base URL of the recipe API
    ///
    /// Invalid values are logged and replaced by the defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let confidence_threshold = parse_setting(
            &lookup,
            "FRIDGE_CONFIDENCE_THRESHOLD",
            defaults.confidence_threshold,
            |v: &f32| (0.0..=1.0).contains(v),
        );
        let max_ingredients_queried = parse_setting(
            &lookup,
            "FRIDGE_MAX_INGREDIENTS_QUERIED",
            defaults.max_ingredients_queried,
            |v: &usize| *v > 0,
        );
        let max_candidates = parse_setting(
            &lookup,
            "FRIDGE_MAX_CANDIDATES",
            defaults.max_candidates,
            |v: &usize| *v > 0,
        );
        let max_detections = parse_setting(
            &lookup,
            "FRIDGE_MAX_DETECTIONS",
            defaults.max_detections,
            |v: &usize| *v > 0,
        );

        let mut fetch = defaults.fetch;
        if let Some(url) = lookup("FRIDGE_RECIPE_API_URL").filter(|u| !u.trim().is_empty()) {
            fetch.base_url = url.trim().trim_end_matches('/').to_string();
        }

        Self {
            confidence_threshold,
            max_ingredients_queried,
            max_candidates,
            max_detections,
            fetch,
        }
    }
}

fn parse_setting<T, F, V>(lookup: &F, key: &str, default: T, valid: V) -> T
where
    T: FromStr + std::fmt::Debug,
    F: Fn(&str) -> Option<String>,
    V: Fn(&T) -> bool,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => {
            debug!("Using {key}={value:?} from environment");
            value
        }
        _ => {
            warn!("Ignoring invalid {key}='{raw}', using default {default:?}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MatchingConfig::default();
        assert_eq!(config.confidence_threshold, 0.4);
        assert_eq!(config.max_ingredients_queried, 6);
        assert_eq!(config.max_candidates, 20);
        assert_eq!(config.fetch.base_url, DEFAULT_RECIPE_API_URL);
    }

    #[test]
    fn test_overrides_applied() {
        let config = MatchingConfig::from_lookup(lookup_from(&[
            ("FRIDGE_CONFIDENCE_THRESHOLD", "0.75"),
            ("FRIDGE_MAX_INGREDIENTS_QUERIED", "3"),
            ("FRIDGE_MAX_CANDIDATES", " 10 "),
            ("FRIDGE_RECIPE_API_URL", "http://localhost:9000/api/"),
        ]));

        assert_eq!(config.confidence_threshold, 0.75);
        assert_eq!(config.max_ingredients_queried, 3);
        assert_eq!(config.max_candidates, 10);
        assert_eq!(config.max_detections, DEFAULT_MAX_DETECTIONS);
        assert_eq!(config.fetch.base_url, "http://localhost:9000/api");
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = MatchingConfig::from_lookup(lookup_from(&[
            ("FRIDGE_CONFIDENCE_THRESHOLD", "1.5"),
            ("FRIDGE_MAX_INGREDIENTS_QUERIED", "0"),
            ("FRIDGE_MAX_CANDIDATES", "lots"),
            ("FRIDGE_RECIPE_API_URL", "  "),
        ]));

        assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(config.max_ingredients_queried, DEFAULT_MAX_INGREDIENTS_QUERIED);
        assert_eq!(config.max_candidates, DEFAULT_MAX_CANDIDATES);
        assert_eq!(config.fetch.base_url, DEFAULT_RECIPE_API_URL);
    }
}
