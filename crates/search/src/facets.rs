//! Category facets for filter chips.

use crate::model::{EnrichedResult, SearchCategory};
use crate::normalize::slugify;
use std::collections::{HashMap, HashSet};

/// Count category labels across the loaded catalog.
///
/// Labels are counted by their original spelling (case-sensitive), once per
/// result. The output is sorted by count descending, then label ascending.
pub fn build_facets(results: &[EnrichedResult]) -> Vec<SearchCategory> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for result in results {
        let mut seen = HashSet::new();
        for label in &result.categories {
            if seen.insert(label.as_str()) {
                *counts.entry(label.as_str()).or_default() += 1;
            }
        }
    }

    let mut facets: Vec<SearchCategory> = counts
        .into_iter()
        .map(|(label, count)| SearchCategory {
            id: slugify(label),
            name: label.to_string(),
            count,
        })
        .collect();

    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    facets
}
