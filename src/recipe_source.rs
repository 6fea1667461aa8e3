//! # Recipe Source Module
//!
//! The recipe source is the external service queried for candidate recipes. This
//! module defines the [`RecipeSource`] trait used by the pipeline and
//! [`MealDbClient`], an implementation over the TheMealDB JSON API.
//!
//! Both lookups may legitimately return "no results"; only transport and protocol
//! failures are errors.

use async_trait::async_trait;
use log::{debug, info, warn};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::circuit_breaker::CircuitBreaker;
use crate::recipe_config::FetchConfig;
use crate::recipe_errors::FetchError;
use crate::recipe_model::{RawRecipeRecord, RecipeId};

/// External recipe lookup service
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Ids of recipes that use the given ingredient
    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeId>, FetchError>;

    /// Full record for a recipe id, `None` if the source does not know it
    async fn lookup_by_id(&self, id: &RecipeId) -> Result<Option<RawRecipeRecord>, FetchError>;
}

/// TheMealDB wraps every result list as `{"meals": [...]}`, with `null` for none
#[derive(Debug, Deserialize)]
struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct MealSummary {
    #[serde(rename = "idMeal")]
    id_meal: String,
}

/// Delay before retry number `attempt` (1-based), with exponential backoff and jitter
///
/// The result never exceeds `max_retry_delay_ms`.
pub fn calculate_retry_delay(attempt: u32, config: &FetchConfig) -> u64 {
    let exponent = attempt.saturating_sub(1).min(16);
    let backoff = config
        .base_retry_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(config.max_retry_delay_ms);
    let jitter = if backoff >= 4 {
        rand::thread_rng().gen_range(0..=backoff / 4)
    } else {
        0
    };
    (backoff + jitter).min(config.max_retry_delay_ms)
}

/// Client for the TheMealDB recipe API
pub struct MealDbClient {
    http: reqwest::Client,
    config: FetchConfig,
    circuit_breaker: CircuitBreaker,
}

impl MealDbClient {
    /// Create a client using the given transport settings
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("fridge-recipes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!("Recipe source client configured for {}", config.base_url);
        Ok(Self {
            http,
            circuit_breaker: CircuitBreaker::new(&config),
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET a JSON document, retrying transient failures behind the circuit breaker
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path);
        let mut attempt = 0;

        loop {
            if self.circuit_breaker.is_open() {
                warn!("Circuit breaker open, skipping request to {url}");
                return Err(FetchError::CircuitOpen);
            }

            match self.get_json_once(&url, query).await {
                Ok(value) => {
                    self.circuit_breaker.record_success();
                    return Ok(value);
                }
                Err(e) => {
                    self.circuit_breaker.record_failure();
                    if !e.is_retryable() || attempt >= self.config.max_retries {
                        return Err(e);
                    }
                    attempt += 1;
                    let delay = calculate_retry_delay(attempt, &self.config);
                    warn!(
                        "Request to {url} failed ({e}), retry {attempt}/{} in {delay}ms",
                        self.config.max_retries
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeId>, FetchError> {
        let envelope: MealsEnvelope<MealSummary> =
            self.get_json("filter.php", &[("i", ingredient)]).await?;
        let ids: Vec<RecipeId> = envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(|meal| meal.id_meal)
            .collect();
        debug!("Ingredient '{ingredient}' matched {} recipes", ids.len());
        Ok(ids)
    }

    async fn lookup_by_id(&self, id: &RecipeId) -> Result<Option<RawRecipeRecord>, FetchError> {
        let envelope: MealsEnvelope<RawRecipeRecord> =
            self.get_json("lookup.php", &[("i", id.as_str())]).await?;
        Ok(envelope.meals.and_then(|meals| meals.into_iter().next()))
    }
}
