//! Catalog records as they arrive from the sources and as the engine serves them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loosely typed scalar from an upstream record.
///
/// Upstream payloads mix numbers and numeric-looking strings for prices,
/// ratings and delivery times. Deserialization never fails: unsupported JSON
/// shapes become [`RawValue::Missing`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RawValue {
    /// A JSON number
    Number(f64),
    /// A JSON string (booleans are stringified)
    Text(String),
    /// Null, absent, or a shape the engine does not understand
    #[default]
    Missing,
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(RawValue::Missing, RawValue::Number),
            Value::String(s) => RawValue::Text(s),
            Value::Bool(b) => RawValue::Text(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => RawValue::Missing,
        }
    }
}

impl From<RawValue> for Value {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Number(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
            RawValue::Text(s) => Value::String(s),
            RawValue::Missing => Value::Null,
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl RawValue {
    /// Returns true if no value was supplied.
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Missing => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(_) => false,
        }
    }

    /// Render the value as trimmed text, if it carries any.
    ///
    /// Integral numbers render without a fractional part so that `12` and
    /// `"12"` produce the same identifier.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            RawValue::Number(n) if n.is_finite() => Some(n.to_string()),
            RawValue::Number(_) => None,
            RawValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawValue::Missing => None,
        }
    }
}

/// Category payload: either a single label or a list of labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RawCategories {
    /// A list of labels
    Many(Vec<RawValue>),
    /// A single label
    One(RawValue),
    /// No category supplied
    #[default]
    Missing,
}

impl From<Value> for RawCategories {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => RawCategories::Many(items.into_iter().map(RawValue::from).collect()),
            Value::Null => RawCategories::Missing,
            other => RawCategories::One(RawValue::from(other)),
        }
    }
}

impl From<RawCategories> for Value {
    fn from(value: RawCategories) -> Self {
        match value {
            RawCategories::Many(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            RawCategories::One(v) => Value::from(v),
            RawCategories::Missing => Value::Null,
        }
    }
}

/// Menu item as returned by the menu source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMenuItem {
    pub id: RawValue,
    /// Secondary identifier used by some backends
    #[serde(rename = "_id")]
    pub legacy_id: RawValue,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: RawValue,
    #[serde(alias = "categories")]
    pub category: RawCategories,
    #[serde(alias = "restaurantId")]
    pub restaurant_id: RawValue,
    #[serde(alias = "eta", alias = "deliveryTime")]
    pub delivery_time: RawValue,
    pub image: Option<String>,
    #[serde(alias = "restaurantName")]
    pub restaurant_name: Option<String>,
    #[serde(alias = "restaurantImage")]
    pub restaurant_image: Option<String>,
    pub rating: RawValue,
    #[serde(alias = "reviewCount")]
    pub review_count: RawValue,
}

/// Restaurant as returned by the restaurant source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRestaurant {
    pub id: RawValue,
    #[serde(rename = "_id")]
    pub legacy_id: RawValue,
    pub name: Option<String>,
    pub image: Option<String>,
    pub rating: RawValue,
    #[serde(alias = "reviewCount")]
    pub review_count: RawValue,
    #[serde(alias = "eta", alias = "deliveryTime")]
    pub delivery_time: RawValue,
}

/// Records that carry a stable identifier.
pub trait Identified {
    /// Stable identifier: explicit id, then secondary id, then display name.
    fn stable_id(&self) -> Option<String>;
}

fn stable_id_of(id: &RawValue, legacy_id: &RawValue, name: Option<&str>) -> Option<String> {
    id.as_text()
        .or_else(|| legacy_id.as_text())
        .or_else(|| name.map(str::trim).filter(|n| !n.is_empty()).map(String::from))
}

impl Identified for RawMenuItem {
    fn stable_id(&self) -> Option<String> {
        stable_id_of(&self.id, &self.legacy_id, self.name.as_deref())
    }
}

impl Identified for RawRestaurant {
    fn stable_id(&self) -> Option<String> {
        stable_id_of(&self.id, &self.legacy_id, self.name.as_deref())
    }
}

/// A menu item merged with the metadata of its restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub description: Option<String>,
    /// Coerced price, `0.0` when missing or invalid
    pub price: f64,
    /// Trimmed, non-empty category labels in source order
    pub categories: Vec<String>,
    pub image: Option<String>,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub restaurant_image: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    /// Delivery time as supplied upstream (item first, then restaurant)
    pub delivery_time: Option<String>,
    /// Parsed delivery time in minutes, used for ETA ordering
    pub eta_minutes: u32,
}

/// Category facet for filter chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCategory {
    /// Key-safe slug of the label
    pub id: String,
    /// Original label
    pub name: String,
    /// Number of loaded results carrying the label
    pub count: usize,
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Score descending, ETA ascending on ties
    #[default]
    Relevance,
    /// Price ascending
    Price,
    /// ETA ascending
    Eta,
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" | "" => Ok(SortMode::Relevance),
            "price" => Ok(SortMode::Price),
            "eta" | "delivery" => Ok(SortMode::Eta),
            other => Err(format!("unknown sort mode: {other}")),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Relevance => write!(f, "relevance"),
            SortMode::Price => write!(f, "price"),
            SortMode::Eta => write!(f, "eta"),
        }
    }
}

/// User-controlled query inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub raw_query: String,
    pub category_filter: Option<String>,
    pub sort_mode: SortMode,
}

impl QueryState {
    /// Create a state for a query with default filter and sort.
    pub fn new(raw_query: impl Into<String>) -> Self {
        Self {
            raw_query: raw_query.into(),
            ..Default::default()
        }
    }

    /// Builder-style method to set the category filter
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_filter = Some(category.into());
        self
    }

    /// Builder-style method to set the sort mode
    #[must_use]
    pub fn with_sort(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_from_json() {
        assert_eq!(RawValue::from(serde_json::json!(12.5)), RawValue::Number(12.5));
        assert_eq!(RawValue::from(serde_json::json!("20-30")), RawValue::Text("20-30".into()));
        assert_eq!(RawValue::from(serde_json::json!(true)), RawValue::Text("true".into()));
        assert_eq!(RawValue::from(serde_json::json!({"a": 1})), RawValue::Missing);
    }

    #[test]
    fn test_raw_value_as_text() {
        assert_eq!(RawValue::Number(12.0).as_text(), Some("12".to_string()));
        assert_eq!(RawValue::Number(1.5).as_text(), Some("1.5".to_string()));
        assert_eq!(RawValue::Text("  ".into()).as_text(), None);
        assert_eq!(RawValue::Missing.as_text(), None);
    }

    #[test]
    fn test_menu_item_deserialize_lenient() {
        let json = r#"{
            "id": 7,
            "name": "Adana Dürüm",
            "price": "145,50 TL",
            "categories": ["Wraps", " Kebab "],
            "restaurantId": "r1",
            "eta": "20-30",
            "rating": null,
            "unknownField": {"nested": true}
        }"#;

        let item: RawMenuItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, RawValue::Number(7.0));
        assert_eq!(item.price, RawValue::Text("145,50 TL".into()));
        assert_eq!(item.restaurant_id, RawValue::Text("r1".into()));
        assert_eq!(item.delivery_time, RawValue::Text("20-30".into()));
        assert_eq!(item.rating, RawValue::Missing);
        assert!(matches!(item.category, RawCategories::Many(ref v) if v.len() == 2));
    }

    #[test]
    fn test_single_category_deserialize() {
        let item: RawMenuItem = serde_json::from_str(r#"{"name": "Ayran", "category": "Drinks"}"#).unwrap();
        assert_eq!(item.category, RawCategories::One(RawValue::Text("Drinks".into())));
    }

    #[test]
    fn test_stable_id_priority() {
        let mut item = RawMenuItem {
            name: Some("Lahmacun".into()),
            ..Default::default()
        };
        assert_eq!(item.stable_id(), Some("Lahmacun".to_string()));

        item.legacy_id = RawValue::Text("abc".into());
        assert_eq!(item.stable_id(), Some("abc".to_string()));

        item.id = RawValue::Number(42.0);
        assert_eq!(item.stable_id(), Some("42".to_string()));
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("Price".parse::<SortMode>().unwrap(), SortMode::Price);
        assert_eq!("eta".parse::<SortMode>().unwrap(), SortMode::Eta);
        assert!("rating".parse::<SortMode>().is_err());
    }
}
