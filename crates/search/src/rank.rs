//! Ordering of scored entries.

use crate::model::{EnrichedResult, SortMode};
use crate::scoring::ScoredEntry;
use std::cmp::Ordering;

/// Order matching entries and return their results.
///
/// Non-matching entries are dropped. All orderings use a stable sort, so
/// entries with equal keys keep their catalog order.
///
/// - [`SortMode::Relevance`]: score descending, then ETA ascending
/// - [`SortMode::Price`]: price ascending, score ignored
/// - [`SortMode::Eta`]: ETA ascending, score ignored
pub fn rank(scored: Vec<ScoredEntry<'_>>, sort_mode: SortMode) -> Vec<EnrichedResult> {
    let mut matches: Vec<ScoredEntry<'_>> = scored.into_iter().filter(|s| s.is_match).collect();

    match sort_mode {
        SortMode::Relevance => matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| eta(a).cmp(&eta(b)))
        }),
        SortMode::Price => matches.sort_by(|a, b| price_cmp(a, b)),
        SortMode::Eta => matches.sort_by_key(eta),
    }

    matches.into_iter().map(|s| s.entry.result.clone()).collect()
}

#[inline]
fn eta(scored: &ScoredEntry<'_>) -> u32 {
    scored.entry.result.eta_minutes
}

#[inline]
fn price_cmp(a: &ScoredEntry<'_>, b: &ScoredEntry<'_>) -> Ordering {
    a.entry.result.price.total_cmp(&b.entry.result.price)
}
