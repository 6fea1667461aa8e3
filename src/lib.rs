//! # Fridge Recipes
//!
//! Turns detected or typed ingredient names into a ranked recipe recommendation
//! and a shopping list of the ingredients still missing.

pub mod candidate_aggregator;
pub mod circuit_breaker;
pub mod classifier;
pub mod fake_source;
pub mod label_mapper;
pub mod localization;
pub mod missing;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod recipe_assembler;
pub mod recipe_config;
pub mod recipe_errors;
pub mod recipe_model;
pub mod recipe_source;
pub mod shopping_list;
