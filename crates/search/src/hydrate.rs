//! Merging raw menu items with restaurant metadata.
//!
//! All coercions here are total: malformed prices, categories or delivery
//! times fall back to deterministic defaults instead of failing.

use crate::model::{EnrichedResult, Identified, RawCategories, RawMenuItem, RawRestaurant, RawValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// ETA used when a record carries no parsable delivery time.
pub const DEFAULT_ETA_MINUTES: u32 = 30;

/// A decimal comma at the end of a price string, e.g. `1.234,50`.
static TRAILING_DECIMAL_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\d{1,2})$").expect("valid regex"));

/// Longest numeric prefix, mirroring how lenient number parsers read input.
static NUMERIC_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)").expect("valid regex"));

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Coerce a raw price into a finite number.
///
/// # Example
/// ```
/// use platter_search::hydrate::coerce_price;
/// use platter_search::RawValue;
///
/// assert_eq!(coerce_price(&RawValue::Text("1.234,50 TL".into())), 1234.5);
/// assert_eq!(coerce_price(&RawValue::Text("$1,299.99".into())), 1299.99);
/// assert_eq!(coerce_price(&RawValue::Missing), 0.0);
/// ```
pub fn coerce_price(value: &RawValue) -> f64 {
    coerce_number(value).unwrap_or(0.0)
}

/// Lenient numeric coercion; `None` when nothing numeric can be read.
pub fn coerce_number(value: &RawValue) -> Option<f64> {
    let parsed = match value {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => parse_numeric_text(s),
        RawValue::Missing => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let negative = trimmed.starts_with('-');

    let mut cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if TRAILING_DECIMAL_COMMA.is_match(&cleaned) {
        cleaned.retain(|c| c != '.');
        if let Some(pos) = cleaned.rfind(',') {
            cleaned.replace_range(pos..=pos, ".");
        }
    }
    cleaned.retain(|c| c != ',');

    if negative {
        cleaned.insert(0, '-');
    }

    NUMERIC_PREFIX
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Resolve a category payload into trimmed, non-empty labels.
pub fn coerce_categories(value: &RawCategories) -> Vec<String> {
    match value {
        RawCategories::Many(items) => items.iter().filter_map(RawValue::as_text).collect(),
        RawCategories::One(single) => single.as_text().into_iter().collect(),
        RawCategories::Missing => Vec::new(),
    }
}

/// Parse a delivery time into minutes.
///
/// Numbers and text follow one rule: the first run of digits in the rendered
/// value (`"20-30"` → 20, `"25 min"` → 25, `-5` → 5). Anything without digits
/// falls back to [`DEFAULT_ETA_MINUTES`].
pub fn parse_eta(value: &RawValue) -> u32 {
    value
        .as_text()
        .and_then(|text| {
            FIRST_INTEGER
                .find(&text)
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(DEFAULT_ETA_MINUTES)
}

/// Drop records whose stable id was already seen; first occurrence wins.
///
/// Records without any identifier are kept as-is.
pub fn dedup_by_id<T: Identified>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| match record.stable_id() {
            Some(id) => seen.insert(id),
            None => true,
        })
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

fn coerce_count(value: &RawValue) -> Option<u64> {
    coerce_number(value).filter(|n| *n >= 0.0).map(|n| n.floor() as u64)
}

/// Merge raw menu items with their restaurants.
///
/// Restaurant fields are only used where the item does not supply its own
/// value. Items without a usable identifier get a positional id.
pub fn hydrate(items: &[RawMenuItem], restaurants: &[RawRestaurant]) -> Vec<EnrichedResult> {
    let lookup: HashMap<String, &RawRestaurant> = restaurants
        .iter()
        .filter_map(|r| r.stable_id().map(|id| (id, r)))
        .collect();

    items
        .iter()
        .enumerate()
        .map(|(position, item)| hydrate_item(position, item, &lookup))
        .collect()
}

fn hydrate_item(
    position: usize,
    item: &RawMenuItem,
    lookup: &HashMap<String, &RawRestaurant>,
) -> EnrichedResult {
    let restaurant_id = item.restaurant_id.as_text();
    let restaurant = restaurant_id.as_ref().and_then(|id| lookup.get(id).copied());

    let delivery_raw = if item.delivery_time.is_missing() {
        restaurant.map_or(&RawValue::Missing, |r| &r.delivery_time)
    } else {
        &item.delivery_time
    };

    EnrichedResult {
        id: item.stable_id().unwrap_or_else(|| format!("item-{position}")),
        name: non_empty(item.name.as_deref()).unwrap_or_default(),
        description: non_empty(item.description.as_deref()),
        price: coerce_price(&item.price),
        categories: coerce_categories(&item.category),
        image: non_empty(item.image.as_deref()),
        restaurant_name: non_empty(item.restaurant_name.as_deref())
            .or_else(|| restaurant.and_then(|r| non_empty(r.name.as_deref()))),
        restaurant_image: non_empty(item.restaurant_image.as_deref())
            .or_else(|| restaurant.and_then(|r| non_empty(r.image.as_deref()))),
        rating: coerce_number(&item.rating)
            .or_else(|| restaurant.and_then(|r| coerce_number(&r.rating))),
        review_count: coerce_count(&item.review_count)
            .or_else(|| restaurant.and_then(|r| coerce_count(&r.review_count))),
        delivery_time: delivery_raw.as_text(),
        eta_minutes: parse_eta(delivery_raw),
        restaurant_id,
    }
}
