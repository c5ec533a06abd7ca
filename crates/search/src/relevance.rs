//! Match quality between a query token and catalog tokens.

use crate::fuzzy::near_match;
use std::collections::BTreeSet;

/// Minimum token length (in characters) for near-matching.
pub const NEAR_MATCH_MIN_LEN: usize = 3;

/// Match quality levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// No match
    None = 0,
    /// One typo apart
    Near = 2,
    /// Candidate contains the query token
    Contains = 3,
    /// One token is a prefix of the other
    Prefix = 4,
    /// Exact match
    Exact = 5,
}

impl MatchTier {
    /// Numeric tier value used by the scorer.
    #[inline]
    pub fn value(self) -> f64 {
        f64::from(self as u8)
    }
}

/// Classify how well a single candidate token matches a query token.
///
/// Both tokens are expected to be normalized.
///
/// # Arguments
/// * `token` - The query token
/// * `candidate` - The catalog token
pub fn match_tier(token: &str, candidate: &str) -> MatchTier {
    if candidate == token {
        return MatchTier::Exact;
    }

    if candidate.starts_with(token) || token.starts_with(candidate) {
        return MatchTier::Prefix;
    }

    if candidate.contains(token) {
        return MatchTier::Contains;
    }

    if token.chars().count() >= NEAR_MATCH_MIN_LEN
        && candidate.chars().count() >= NEAR_MATCH_MIN_LEN
        && near_match(token, candidate)
    {
        return MatchTier::Near;
    }

    MatchTier::None
}

/// Best tier a query token reaches against any token of a set.
pub fn best_tier(token: &str, candidates: &BTreeSet<String>) -> MatchTier {
    let mut best = MatchTier::None;
    for candidate in candidates {
        let tier = match_tier(token, candidate);
        if tier > best {
            best = tier;
            if best == MatchTier::Exact {
                break;
            }
        }
    }
    best
}
