//! Live catalog search for Platter.
//!
//! This crate provides:
//! - Turkish-aware text normalization and tokenization
//! - Hydration of raw menu items with restaurant metadata
//! - Weighted multi-field fuzzy scoring with one-typo tolerance
//! - Deterministic ranking by relevance, price or ETA
//! - Category facets
//! - A debounced, stale-safe query controller over async catalog sources
//!
//! # Example
//!
//! ```
//! use platter_search::{Catalog, FieldWeights, QueryState, SortMode, StaticCatalog};
//!
//! let source = StaticCatalog::from_json(r#"{
//!     "menu_items": [
//!         {"id": 1, "name": "Adana Dürüm", "price": "165,00", "category": "Wraps", "restaurant_id": "r1"},
//!         {"id": 2, "name": "Tavuk Dürüm", "price": "140,00", "category": "Wraps", "restaurant_id": "r1"}
//!     ],
//!     "restaurants": [{"id": "r1", "name": "Dürümcü Emmi", "delivery_time": "20-30"}]
//! }"#).unwrap();
//!
//! let catalog = Catalog::build(source.menu_items, source.restaurants);
//! let state = QueryState::new("durum").with_sort(SortMode::Price);
//! let results = catalog.search(&state, &FieldWeights::default(), None);
//!
//! assert_eq!(results[0].name, "Tavuk Dürüm");
//! assert_eq!(results[0].eta_minutes, 20);
//! ```

pub mod catalog;
pub mod controller;
mod error;
pub mod facets;
mod fuzzy;
pub mod hydrate;
pub mod index;
pub mod model;
mod normalize;
pub mod rank;
pub mod relevance;
pub mod scoring;
pub mod source;

pub use catalog::Catalog;
pub use controller::{EngineConfig, Phase, QueryController, SearchView};
pub use error::{Result, SearchError, SourceKind};
pub use facets::build_facets;
pub use fuzzy::near_match;
pub use hydrate::{dedup_by_id, hydrate};
pub use index::{index, IndexedEntry};
pub use model::{
    EnrichedResult, QueryState, RawCategories, RawMenuItem, RawRestaurant, RawValue,
    SearchCategory, SortMode,
};
pub use normalize::{normalize, slugify, tokenize};
pub use rank::rank;
pub use relevance::{match_tier, MatchTier};
pub use scoring::{score_entry, FieldWeights, ScoredEntry};
pub use source::{CatalogSource, StaticCatalog};
