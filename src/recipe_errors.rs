//! # Recipe Error Types Module
//!
//! This module defines the error types used throughout the recipe matching pipeline.
//! Per-call transport failures are `FetchError`s; everything the caller sees at the
//! pipeline boundary is a `RecipeError`.

use thiserror::Error;

/// Failure of a single call to an external recipe source
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status
    #[error("Recipe source returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The body was not the expected JSON shape
    #[error("Failed to decode recipe source response: {0}")]
    Decode(String),

    /// Too many consecutive failures, calls are short-circuited
    #[error("Recipe source circuit breaker is open")]
    CircuitOpen,

    /// Source-specific failure without an HTTP status
    #[error("Recipe source unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Decode(_) | FetchError::CircuitOpen | FetchError::Unavailable(_) => false,
        }
    }
}

/// Errors surfaced by the matching engine
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Empty or otherwise unusable input, e.g. no ingredients supplied
    #[error("Validation error: {0}")]
    Validation(String),

    /// Candidate aggregation produced zero recipe ids
    #[error("No candidates found: {0}")]
    NoCandidates(String),

    /// No usable recipe records, or ranking received an empty list
    #[error("No recipe found: {0}")]
    NoRecipe(String),

    /// A raw recipe record is missing required fields
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// A single external call failed
    #[error("External fetch error: {0}")]
    ExternalFetch(#[from] FetchError),
}

impl RecipeError {
    /// Localization key for the user-facing rendering of this error
    pub fn message_key(&self) -> &'static str {
        match self {
            RecipeError::Validation(_) => "error-validation",
            RecipeError::NoCandidates(_) => "error-no-candidates",
            RecipeError::NoRecipe(_) => "error-no-recipe",
            RecipeError::Assembly(_) => "error-assembly",
            RecipeError::ExternalFetch(_) => "error-external-fetch",
        }
    }
}
