//! Text normalization and tokenization.
//!
//! Every string that takes part in matching (catalog fields, query text,
//! category filters) goes through [`normalize`], so comparisons only ever see
//! lowercase ASCII letters, digits and single spaces.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fixed folding table for Turkish letters, applied before decomposition.
///
/// `ı` and `İ` have no ASCII decomposition, and lowercasing `İ` yields a
/// dotted sequence, so the table handles them explicitly.
#[inline]
fn fold_turkish(c: char) -> Option<char> {
    match c {
        'ç' | 'Ç' => Some('c'),
        'ğ' | 'Ğ' => Some('g'),
        'ı' | 'I' | 'İ' => Some('i'),
        'ö' | 'Ö' => Some('o'),
        'ş' | 'Ş' => Some('s'),
        'ü' | 'Ü' => Some('u'),
        _ => None,
    }
}

/// Canonicalize text into a comparable form.
///
/// Lowercases, folds Turkish letters, strips combining marks, replaces any
/// character outside `[a-z0-9]` with a space and collapses whitespace.
///
/// # Example
/// ```
/// use platter_search::normalize;
///
/// assert_eq!(normalize("Çörek Ekmeği"), "corek ekmegi");
/// assert_eq!(normalize("  Crème-Brûlée!! "), "creme brulee");
/// ```
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_turkish(c) {
            Some(f) => folded.push(f),
            None => folded.extend(c.to_lowercase()),
        }
    }

    let spaced: String = folded
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into tokens.
///
/// Empty input (or input made only of punctuation) yields no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Build a key-safe facet id from a category label.
///
/// Whitespace runs become a single `-`; everything else is kept as-is.
pub fn slugify(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join("-")
}
