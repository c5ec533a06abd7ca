//! Weighted multi-field scoring of indexed entries.

use crate::index::IndexedEntry;
use crate::normalize::normalize;
use crate::relevance::best_tier;
use serde::{Deserialize, Serialize};

/// Score given to every entry that passes the category gate on an empty query.
pub const BASELINE_SCORE: f64 = 1.0;

/// Field weights applied to match tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub restaurant: f64,
    pub category: f64,
    pub any: f64,
    /// Bonus added once per query token
    pub token_bonus: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 3.0,
            restaurant: 2.0,
            category: 1.5,
            any: 1.0,
            token_bonus: 0.4,
        }
    }
}

/// Outcome of scoring one entry against one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredEntry<'a> {
    pub entry: &'a IndexedEntry,
    pub is_match: bool,
    pub score: f64,
}

/// Check the category filter against an entry.
///
/// The normalized filter must appear inside one of the entry's category
/// tokens or normalized labels. A filter that normalizes to nothing still
/// requires the entry to carry at least one category.
pub fn passes_category(entry: &IndexedEntry, category_filter: Option<&str>) -> bool {
    let Some(filter) = category_filter else {
        return true;
    };

    let needle = normalize(filter);
    entry.category_tokens.iter().any(|t| t.contains(&needle))
        || entry.category_labels.iter().any(|l| l.contains(&needle))
}

/// Best weighted score of a single query token across the entry's fields.
pub fn token_score(entry: &IndexedEntry, token: &str, weights: &FieldWeights) -> f64 {
    let name = best_tier(token, &entry.name_tokens).value() * weights.name;
    let restaurant = best_tier(token, &entry.restaurant_tokens).value() * weights.restaurant;
    let category = best_tier(token, &entry.category_tokens).value() * weights.category;
    let any = best_tier(token, &entry.all_tokens).value() * weights.any;

    name.max(restaurant).max(category).max(any)
}

/// Score an entry against normalized query tokens.
///
/// Every token has to match at least one field; a single unmatched token
/// rejects the entry. Returns `(is_match, score)`.
pub fn score_entry(
    entry: &IndexedEntry,
    query_tokens: &[String],
    category_filter: Option<&str>,
    weights: &FieldWeights,
) -> (bool, f64) {
    if !passes_category(entry, category_filter) {
        return (false, 0.0);
    }

    if query_tokens.is_empty() {
        return (true, BASELINE_SCORE);
    }

    let mut total = 0.0;
    for token in query_tokens {
        let score = token_score(entry, token, weights);
        if score <= 0.0 {
            return (false, 0.0);
        }
        total += score;
    }

    total += weights.token_bonus * query_tokens.len() as f64;
    (true, total)
}

/// Score every entry of a catalog, preserving catalog order.
pub fn score_all<'a>(
    entries: &'a [IndexedEntry],
    query_tokens: &[String],
    category_filter: Option<&str>,
    weights: &FieldWeights,
) -> Vec<ScoredEntry<'a>> {
    let score_one = |entry: &'a IndexedEntry| {
        let (is_match, score) = score_entry(entry, query_tokens, category_filter, weights);
        ScoredEntry {
            entry,
            is_match,
            score,
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        entries.par_iter().map(score_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        entries.iter().map(score_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnrichedResult;
    use crate::normalize::tokenize;

    fn entry(name: &str, restaurant: Option<&str>, categories: &[&str]) -> IndexedEntry {
        IndexedEntry::new(EnrichedResult {
            id: name.to_string(),
            name: name.to_string(),
            description: None,
            price: 0.0,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            image: None,
            restaurant_id: None,
            restaurant_name: restaurant.map(String::from),
            restaurant_image: None,
            rating: None,
            review_count: None,
            delivery_time: None,
            eta_minutes: 30,
        })
    }

    fn score(entry: &IndexedEntry, query: &str, category: Option<&str>) -> (bool, f64) {
        score_entry(entry, &tokenize(query), category, &FieldWeights::default())
    }

    #[test]
    fn test_exact_name_match_score() {
        let e = entry("Pizza", None, &[]);
        let (is_match, s) = score(&e, "pizza", None);
        assert!(is_match);
        // exact name hit 5 * 3 + bonus 0.4
        assert!((s - 15.4).abs() < 1e-9);
    }

    #[test]
    fn test_near_match_is_tolerated() {
        let e = entry("Pizza Margherita", None, &[]);
        let (is_match, s) = score(&e, "piza", None);
        assert!(is_match);
        assert!((s - (2.0 * 3.0 + 0.4)).abs() < 1e-9);

        let (is_match, _) = score(&e, "xyz", None);
        assert!(!is_match);
    }

    #[test]
    fn test_and_semantics() {
        let drink = entry("Ayran", None, &["Cold Drinks"]);
        let (is_match, _) = score(&drink, "cold drink", None);
        assert!(is_match);

        let soup = entry("Cold Soup", None, &["Soups"]);
        let (is_match, s) = score(&soup, "cold drink", None);
        assert!(!is_match);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_restaurant_field_weight() {
        let e = entry("Lahmacun", Some("Halil Usta"), &[]);
        let (is_match, s) = score(&e, "halil", None);
        assert!(is_match);
        assert!((s - (5.0 * 2.0 + 0.4)).abs() < 1e-9);
    }

    #[test]
    fn test_category_gate_rejects() {
        let burger = entry("Chicken Burger", None, &["Burgers"]);
        let wrap = entry("Chicken Wrap", None, &["Wraps"]);

        assert_eq!(score(&burger, "chicken", Some("wraps")), (false, 0.0));
        assert!(score(&wrap, "chicken", Some("wraps")).0);
        assert!(score(&wrap, "chicken", Some("WRAP")).0);
    }

    #[test]
    fn test_category_gate_multi_word_label() {
        let drink = entry("Ayran", None, &["Cold Drinks"]);
        assert!(score(&drink, "", Some("Cold Drinks")).0);
        assert!(score(&drink, "", Some("Cold-Drinks")).0);
        assert!(!score(&drink, "", Some("Hot Drinks")).0);
    }

    #[test]
    fn test_empty_query_baseline() {
        let e = entry("Anything", None, &["Burgers"]);
        assert_eq!(score(&e, "", Some("burgers")), (true, BASELINE_SCORE));
        assert_eq!(score(&e, "  ", None), (true, BASELINE_SCORE));
        assert_eq!(score(&e, "", Some("   ")), (true, BASELINE_SCORE));
    }

    #[test]
    fn test_blank_category_filter_rejects_uncategorized() {
        let plain = entry("Su", None, &[]);
        assert_eq!(score(&plain, "", Some("  ")), (false, 0.0));
        assert_eq!(score(&plain, "su", Some("-")), (false, 0.0));
        assert!(score(&plain, "su", None).0);
    }

    #[test]
    fn test_deterministic() {
        let e = entry("Tavuk Şiş", Some("Şişçi"), &["Grill", "Kebab"]);
        let first = score(&e, "tavuk sis", None);
        for _ in 0..10 {
            assert_eq!(score(&e, "tavuk sis", None), first);
        }
    }

    #[test]
    fn test_score_all_preserves_order() {
        let entries = vec![entry("Pizza", None, &[]), entry("Sushi", None, &[]), entry("Pide", None, &[])];
        let scored = score_all(&entries, &tokenize("pi"), None, &FieldWeights::default());
        let names: Vec<_> = scored.iter().map(|s| s.entry.result.name.as_str()).collect();
        assert_eq!(names, vec!["Pizza", "Sushi", "Pide"]);
        assert!(scored[0].is_match);
        assert!(!scored[1].is_match);
        assert!(scored[2].is_match);
    }
}
