//! Fake recipe source for testing.
//!
//! Serves canned ingredient -> id and id -> record data from memory, so the
//! matching pipeline can run without network access.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::recipe_errors::FetchError;
use crate::recipe_model::{RawRecipeRecord, RecipeId};
use crate::recipe_source::RecipeSource;

/// An in-memory recipe source with optional injected failures
#[derive(Debug, Default)]
pub struct FakeRecipeSource {
    by_ingredient: HashMap<String, Vec<RecipeId>>,
    records: HashMap<RecipeId, RawRecipeRecord>,
    failing_ingredients: HashSet<String>,
    failing_ids: HashSet<RecipeId>,
    filter_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
}

impl FakeRecipeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the ids returned for an ingredient query
    pub fn with_ingredient(mut self, ingredient: &str, ids: &[&str]) -> Self {
        self.by_ingredient.insert(
            ingredient.to_string(),
            ids.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    /// Register the record returned for an id
    pub fn with_record(mut self, id: &str, record: RawRecipeRecord) -> Self {
        self.records.insert(id.to_string(), record);
        self
    }

    /// Register a simple record built from a title and ingredient names
    pub fn with_recipe(self, id: &str, title: &str, ingredients: &[&str]) -> Self {
        let record = ingredients.iter().enumerate().fold(
            RawRecipeRecord::new()
                .with_field("idMeal", id)
                .with_field("strMeal", title),
            |record, (i, name)| record.with_field(&format!("strIngredient{}", i + 1), name),
        );
        self.with_record(id, record)
    }

    /// Make queries for this ingredient fail
    pub fn failing_ingredient(mut self, ingredient: &str) -> Self {
        self.failing_ingredients.insert(ingredient.to_string());
        self
    }

    /// Make lookups of this id fail
    pub fn failing_id(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    /// Number of ingredient queries served so far
    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::SeqCst)
    }

    /// Number of id lookups served so far
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeSource for FakeRecipeSource {
    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeId>, FetchError> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_ingredients.contains(ingredient) {
            return Err(FetchError::Unavailable(format!(
                "injected failure for ingredient '{ingredient}'"
            )));
        }
        Ok(self.by_ingredient.get(ingredient).cloned().unwrap_or_default())
    }

    async fn lookup_by_id(&self, id: &RecipeId) -> Result<Option<RawRecipeRecord>, FetchError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_ids.contains(id) {
            return Err(FetchError::Unavailable(format!("injected failure for id '{id}'")));
        }
        Ok(self.records.get(id).cloned())
    }
}
