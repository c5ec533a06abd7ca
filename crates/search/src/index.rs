//! Per-record token sets used for matching.

use crate::model::EnrichedResult;
use crate::normalize::{normalize, tokenize};
use std::collections::BTreeSet;

/// An enriched record with its derived token sets.
///
/// Built once per catalog snapshot and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    pub result: EnrichedResult,
    pub name_tokens: BTreeSet<String>,
    pub restaurant_tokens: BTreeSet<String>,
    /// Union of the tokens of every category label
    pub category_tokens: BTreeSet<String>,
    /// Normalized full category labels, used by the category filter
    pub category_labels: Vec<String>,
    /// Name, description, restaurant and category tokens
    pub all_tokens: BTreeSet<String>,
}

impl IndexedEntry {
    /// Tokenize every searchable field of a result.
    pub fn new(result: EnrichedResult) -> Self {
        let name_tokens: BTreeSet<String> = tokenize(&result.name).into_iter().collect();
        let restaurant_tokens: BTreeSet<String> = result
            .restaurant_name
            .as_deref()
            .map(tokenize)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let description_tokens = result.description.as_deref().map(tokenize).unwrap_or_default();

        let category_tokens: BTreeSet<String> = result
            .categories
            .iter()
            .flat_map(|label| tokenize(label))
            .collect();
        let category_labels = result
            .categories
            .iter()
            .map(|label| normalize(label))
            .filter(|label| !label.is_empty())
            .collect();

        let mut all_tokens = BTreeSet::new();
        all_tokens.extend(name_tokens.iter().cloned());
        all_tokens.extend(description_tokens);
        all_tokens.extend(restaurant_tokens.iter().cloned());
        all_tokens.extend(category_tokens.iter().cloned());

        Self {
            result,
            name_tokens,
            restaurant_tokens,
            category_tokens,
            category_labels,
            all_tokens,
        }
    }
}

/// Build the token index for a set of enriched results, preserving order.
pub fn index(results: &[EnrichedResult]) -> Vec<IndexedEntry> {
    results.iter().cloned().map(IndexedEntry::new).collect()
}
