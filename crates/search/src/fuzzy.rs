//! Fuzzy matching algorithms.

/// Check whether two tokens differ by at most one typo.
///
/// This is a bounded approximation rather than a full edit distance: strings
/// whose lengths differ by more than one are rejected outright, then a single
/// pass with two cursors allows one mismatch in total. On a mismatch the
/// cursor of the longer string advances (one insertion or deletion), or both
/// advance when the lengths are equal (one substitution).
///
/// # Arguments
/// * `a` - First token
/// * `b` - Second token
///
/// # Returns
/// true if `a` and `b` are equal or one typo apart
///
/// # Example
/// ```
/// use platter_search::near_match;
///
/// assert!(near_match("piza", "pizza"));
/// assert!(near_match("burgr", "burger"));
/// assert!(!near_match("xyz", "pizza"));
/// ```
pub fn near_match(a: &str, b: &str) -> bool {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m.abs_diff(n) > 1 {
        return false;
    }

    let (mut i, mut j) = (0, 0);
    let mut mismatches = 0;

    while i < m && j < n {
        if a_chars[i] == b_chars[j] {
            i += 1;
            j += 1;
            continue;
        }

        mismatches += 1;
        if mismatches > 1 {
            return false;
        }

        match m.cmp(&n) {
            std::cmp::Ordering::Greater => i += 1,
            std::cmp::Ordering::Less => j += 1,
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }

    // A trailing extra character on the longer side is the one allowed edit.
    mismatches += (m - i) + (n - j);
    mismatches <= 1
}
