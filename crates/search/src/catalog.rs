//! Immutable catalog snapshots and the pure search pipeline over them.

use crate::facets::build_facets;
use crate::hydrate::{dedup_by_id, hydrate};
use crate::index::{index, IndexedEntry};
use crate::model::{EnrichedResult, QueryState, RawMenuItem, RawRestaurant, SearchCategory};
use crate::normalize::tokenize;
use crate::rank::rank;
use crate::scoring::{score_all, FieldWeights};

/// A hydrated, indexed catalog.
///
/// Snapshots are built in one go and replaced wholesale when new source data
/// arrives; nothing in here is mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    results: Vec<EnrichedResult>,
    entries: Vec<IndexedEntry>,
    facets: Vec<SearchCategory>,
}

impl Catalog {
    /// A catalog with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from raw source records.
    ///
    /// Each source is de-duplicated by stable id (first occurrence wins)
    /// before hydration.
    pub fn build(menu_items: Vec<RawMenuItem>, restaurants: Vec<RawRestaurant>) -> Self {
        platter_telemetry::timed_span!(
            "catalog.build",
            menu_items = menu_items.len(),
            restaurants = restaurants.len()
        );
        let menu_items = dedup_by_id(menu_items);
        let restaurants = dedup_by_id(restaurants);
        Self::from_results(hydrate(&menu_items, &restaurants))
    }

    /// Build a catalog from already enriched results.
    pub fn from_results(results: Vec<EnrichedResult>) -> Self {
        let entries = index(&results);
        let facets = build_facets(&results);
        Self {
            results,
            entries,
            facets,
        }
    }

    /// Enriched records in source order.
    pub fn results(&self) -> &[EnrichedResult] {
        &self.results
    }

    /// Indexed entries in source order.
    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    /// Category facets over the whole catalog.
    pub fn facets(&self) -> &[SearchCategory] {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Run a query: score, filter, rank and optionally truncate.
    ///
    /// # Example
    /// ```
    /// use platter_search::{Catalog, FieldWeights, QueryState, RawMenuItem};
    ///
    /// let items: Vec<RawMenuItem> = serde_json::from_str(
    ///     r#"[{"id": 1, "name": "Margherita Pizza", "price": 120},
    ///         {"id": 2, "name": "Cheeseburger", "price": 150}]"#,
    /// ).unwrap();
    ///
    /// let catalog = Catalog::build(items, Vec::new());
    /// let results = catalog.search(&QueryState::new("piza"), &FieldWeights::default(), None);
    /// assert_eq!(results.len(), 1);
    /// assert_eq!(results[0].name, "Margherita Pizza");
    /// ```
    pub fn search(
        &self,
        state: &QueryState,
        weights: &FieldWeights,
        max_results: Option<usize>,
    ) -> Vec<EnrichedResult> {
        let query_tokens = tokenize(&state.raw_query);
        let scored = score_all(
            &self.entries,
            &query_tokens,
            state.category_filter.as_deref(),
            weights,
        );

        let mut ranked = rank(scored, state.sort_mode);
        if let Some(max) = max_results {
            ranked.truncate(max);
        }
        ranked
    }
}
