//! # Ingredient Name Normalizer
//!
//! Canonicalizes free-text or detector-produced ingredient names so they can be
//! compared with plain string equality.
//!
//! ## Canonical form
//!
//! - Lowercased
//! - Parenthetical asides removed (`"olive oil (extra virgin)"` -> `"olive oil"`)
//! - Everything except `a-z`, digits, whitespace and `-` stripped
//! - Surrounding whitespace trimmed
//!
//! Internal spaces are kept, so `"olive oil"` and `"olive"` stay distinct.

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(r"\(.+?\)").expect("Parenthetical pattern should be valid");
    static ref DISALLOWED_CHARS_REGEX: Regex =
        Regex::new(r"[^a-z0-9\s-]").expect("Disallowed character pattern should be valid");
}

/// Canonicalize a single ingredient name
///
/// Never fails: empty input yields an empty string, as does input made only of
/// stripped characters (e.g. `"???"`).
///
/// # Examples
///
/// ```rust
/// use fridge_recipes::normalizer::canonicalize;
///
/// assert_eq!(canonicalize("Olive Oil (extra virgin)"), "olive oil");
/// assert_eq!(canonicalize("EGGS?"), "eggs");
/// assert_eq!(canonicalize("???"), "");
/// ```
pub fn canonicalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_asides = PARENTHETICAL_REGEX.replace_all(&lowered, "");
    let stripped = DISALLOWED_CHARS_REGEX.replace_all(&without_asides, "");
    let canonical = stripped.trim().to_string();
    trace!("Canonicalized ingredient name: '{}' -> '{}'", raw, canonical);
    canonical
}

/// A deduplicated set of canonical ingredient names
///
/// Membership is plain string equality on canonical forms. Iteration follows
/// first-occurrence order so that downstream fan-out is deterministic for a given
/// input ordering.
#[derive(Debug, Clone, Default)]
pub struct IngredientSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl IngredientSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-canonical name; returns `false` if it was present or empty
    pub fn insert_canonical(&mut self, name: String) -> bool {
        if name.is_empty() || self.members.contains(&name) {
            return false;
        }
        self.members.insert(name.clone());
        self.order.push(name);
        true
    }

    /// Whether the canonical name is a member
    pub fn contains(&self, canonical: &str) -> bool {
        self.members.contains(canonical)
    }

    /// Whether the raw name, once canonicalized, is a member
    pub fn contains_raw(&self, raw: &str) -> bool {
        self.contains(&canonicalize(raw))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Canonicalize every element, drop empty results and deduplicate
///
/// # Examples
///
/// ```rust
/// use fridge_recipes::normalizer::unique;
///
/// let set = unique(["Egg", "egg", "EGGS?"]);
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("egg"));
/// assert!(set.contains("eggs"));
/// ```
pub fn unique<I, S>(raw_names: I) -> IngredientSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = IngredientSet::new();
    for raw in raw_names {
        set.insert_canonical(canonicalize(raw.as_ref()));
    }
    set
}
