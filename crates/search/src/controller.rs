//! Reactive query controller.
//!
//! Owns the query state, debounces query-text changes, fetches both catalog
//! sources concurrently and publishes derived views. Overlapping fetches are
//! resolved with an epoch counter: every dispatch takes the next epoch, and a
//! response is only accepted while its epoch is still the current one.
//!
//! ```text
//! Idle ──query/refetch──▶ Fetching ──both ok / one ok──▶ Settled
//!                            │  ▲                          │
//!                            │  └──────query/refetch───────┤
//!                            └──both failed──▶ Errored ────┘
//! ```

use crate::catalog::Catalog;
use crate::error::{Result, SearchError, SourceKind};
use crate::model::{EnrichedResult, QueryState, RawMenuItem, RawRestaurant, SearchCategory, SortMode};
use crate::scoring::FieldWeights;
use crate::source::CatalogSource;
use platter_telemetry::{metrics, Timer};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default debounce applied to query-text changes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Default per-source fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Quiet period after the last keystroke before fetching
    pub debounce: Duration,
    /// Per-source timeout; a timed-out source counts as failed
    pub fetch_timeout: Option<Duration>,
    pub weights: FieldWeights,
    /// Truncate ranked results
    pub max_results: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
            weights: FieldWeights::default(),
            max_results: None,
        }
    }
}

impl EngineConfig {
    /// Builder-style method to set the debounce
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Builder-style method to set the fetch timeout
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Builder-style method to set the field weights
    #[must_use]
    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Builder-style method to cap the number of results
    #[must_use]
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing fetched yet
    Idle,
    /// A fetch is in flight
    Fetching,
    /// The latest accepted response had data from at least one source
    Settled,
    /// Both sources failed on the latest accepted response
    Errored,
}

/// Published read model.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    /// Ranked, filtered results
    pub results: Vec<EnrichedResult>,
    /// Facets over the whole loaded catalog
    pub facets: Vec<SearchCategory>,
    pub is_loading: bool,
    /// User-facing error when every source failed
    pub error: Option<String>,
    pub phase: Phase,
    /// Sources that failed on the latest accepted response
    pub failed_sources: Vec<SourceKind>,
    /// Epoch of the latest accepted response (0 before the first one)
    pub epoch: u64,
}

impl SearchView {
    fn initial() -> Self {
        Self {
            results: Vec::new(),
            facets: Vec::new(),
            is_loading: false,
            error: None,
            phase: Phase::Idle,
            failed_sources: Vec::new(),
            epoch: 0,
        }
    }
}

struct ControllerState {
    /// Live inputs; `raw_query` may be ahead of the loaded catalog
    query: QueryState,
    /// Query text sent with the most recent dispatch
    dispatched_query: String,
    /// Query text of the most recent accepted response, used for scoring
    committed_query: String,
    catalog: Arc<Catalog>,
    phase: Phase,
    error: Option<String>,
    failed_sources: Vec<SourceKind>,
    /// Epoch of the most recent dispatch
    current_epoch: u64,
    /// Epoch of the most recent accepted response
    settled_epoch: u64,
    debounce_seq: u64,
    debounce: Option<JoinHandle<()>>,
}

struct Inner<S> {
    source: S,
    config: EngineConfig,
    state: Mutex<ControllerState>,
    view: watch::Sender<Arc<SearchView>>,
}

/// Live search over a catalog source.
///
/// Cloning is cheap and every clone drives the same state. Methods that
/// trigger fetches must be called from within a tokio runtime.
pub struct QueryController<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for QueryController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CatalogSource> QueryController<S> {
    /// Create an idle controller with an empty query and relevance sort.
    pub fn new(source: S, config: EngineConfig) -> Self {
        let (view, _) = watch::channel(Arc::new(SearchView::initial()));
        let state = ControllerState {
            query: QueryState::default(),
            dispatched_query: String::new(),
            committed_query: String::new(),
            catalog: Arc::new(Catalog::empty()),
            phase: Phase::Idle,
            error: None,
            failed_sources: Vec::new(),
            current_epoch: 0,
            settled_epoch: 0,
            debounce_seq: 0,
            debounce: None,
        };

        Self {
            inner: Arc::new(Inner {
                source,
                config,
                state: Mutex::new(state),
                view,
            }),
        }
    }

    /// Engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    /// Update the query text and restart the debounce timer.
    ///
    /// Results are refreshed once the timer fires and the fetch it starts
    /// completes. Setting the same text again is a no-op.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.inner.lock();
        if state.query.raw_query == text {
            return;
        }
        state.query.raw_query = text;

        state.debounce_seq += 1;
        let seq = state.debounce_seq;
        if let Some(pending) = state.debounce.take() {
            pending.abort();
        }

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.debounce;
        state.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.debounce_fired(seq);
        }));
    }

    /// Change the category filter; re-ranks the held catalog without fetching.
    pub fn set_category(&self, category: Option<String>) {
        let mut state = self.inner.lock();
        state.query.category_filter = category;
        self.inner.publish(&state);
    }

    /// Change the sort mode; re-ranks the held catalog without fetching.
    pub fn set_sort(&self, sort_mode: SortMode) {
        let mut state = self.inner.lock();
        state.query.sort_mode = sort_mode;
        self.inner.publish(&state);
    }

    /// Fetch immediately for the current query, skipping the debounce.
    pub fn refetch(&self) {
        let mut state = self.inner.lock();
        state.debounce_seq += 1;
        if let Some(pending) = state.debounce.take() {
            pending.abort();
        }
        self.inner.dispatch(&mut state);
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn raw_query(&self) -> String {
        self.inner.lock().query.raw_query.clone()
    }

    pub fn category_filter(&self) -> Option<String> {
        self.inner.lock().query.category_filter.clone()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.inner.lock().query.sort_mode
    }

    /// Current query inputs.
    pub fn query_state(&self) -> QueryState {
        self.inner.lock().query.clone()
    }

    /// Latest published view.
    pub fn snapshot(&self) -> Arc<SearchView> {
        self.inner.view.borrow().clone()
    }

    pub fn results(&self) -> Vec<EnrichedResult> {
        self.snapshot().results.clone()
    }

    pub fn facets(&self) -> Vec<SearchCategory> {
        self.snapshot().facets.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.snapshot().error.clone()
    }

    pub fn phase(&self) -> Phase {
        self.snapshot().phase
    }

    /// The catalog snapshot currently backing the results.
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.inner.lock().catalog)
    }

    /// Subscribe to published views.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SearchView>> {
        self.inner.view.subscribe()
    }

    /// Wait until no debounce is pending and no fetch is in flight.
    ///
    /// Returns immediately when the controller is already quiet, including
    /// before the first fetch.
    pub async fn settled(&self) -> Arc<SearchView> {
        let mut rx = self.subscribe();
        loop {
            {
                let state = self.inner.lock();
                if state.debounce.is_none() && state.phase != Phase::Fetching {
                    return self.snapshot();
                }
            }
            if rx.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }
}

impl<S: CatalogSource> Inner<S> {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn debounce_fired(self: &Arc<Self>, seq: u64) {
        let mut state = self.lock();
        if state.debounce_seq != seq {
            debug!(seq, "debounce superseded");
            return;
        }
        state.debounce = None;
        self.dispatch(&mut state);
    }

    fn dispatch(self: &Arc<Self>, state: &mut ControllerState) {
        state.current_epoch += 1;
        let epoch = state.current_epoch;
        state.dispatched_query = state.query.raw_query.clone();
        let hint = fetch_hint(&state.dispatched_query);

        state.phase = Phase::Fetching;
        self.publish(state);

        metrics().increment("search.fetch.dispatched");
        info!(epoch, hint = ?hint, "dispatching catalog fetch");

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let timer = Timer::start("search.fetch_ms");
            let (menu, restaurants) = tokio::join!(
                inner.guarded(SourceKind::Menu, inner.source.fetch_menu_items(hint.as_deref())),
                inner.guarded(
                    SourceKind::Restaurants,
                    inner.source.fetch_restaurants(hint.as_deref())
                ),
            );
            let elapsed = timer.stop();
            debug!(epoch, elapsed_ms = elapsed.as_millis() as u64, "catalog fetch finished");
            inner.complete(epoch, menu, restaurants);
        });
    }

    /// Apply the configured timeout to a source call.
    async fn guarded<T>(
        &self,
        source_kind: SourceKind,
        fetch: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.config.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.unwrap_or_else(|_| {
                Err(SearchError::SourceTimeout {
                    source_kind,
                    elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })
            }),
            None => fetch.await,
        }
    }

    fn complete(
        &self,
        epoch: u64,
        menu: Result<Vec<RawMenuItem>>,
        restaurants: Result<Vec<RawRestaurant>>,
    ) {
        let mut state = self.lock();
        if epoch != state.current_epoch {
            metrics().increment("search.fetch.stale");
            debug!(epoch, current = state.current_epoch, "discarding stale response");
            return;
        }

        let mut failed_sources = Vec::new();
        let mut reasons = Vec::new();

        let menu_items = menu.unwrap_or_else(|e| {
            warn!(epoch, error = %e, "menu source failed");
            failed_sources.push(SourceKind::Menu);
            reasons.push(e.to_string());
            Vec::new()
        });
        let restaurants = restaurants.unwrap_or_else(|e| {
            warn!(epoch, error = %e, "restaurant source failed");
            failed_sources.push(SourceKind::Restaurants);
            reasons.push(e.to_string());
            Vec::new()
        });

        metrics().increment_by("search.fetch.source_failures", failed_sources.len() as u64);

        if failed_sources.len() == 2 {
            state.catalog = Arc::new(Catalog::empty());
            state.phase = Phase::Errored;
            state.error = Some(format!("Search is unavailable: {}", reasons.join("; ")));
        } else {
            state.catalog = Arc::new(Catalog::build(menu_items, restaurants));
            state.phase = Phase::Settled;
            state.error = None;
        }
        state.failed_sources = failed_sources;
        state.settled_epoch = epoch;
        state.committed_query = state.dispatched_query.clone();

        metrics().gauge("search.catalog.records", state.catalog.len() as u64);
        info!(
            epoch,
            phase = ?state.phase,
            records = state.catalog.len(),
            "catalog snapshot published"
        );
        self.publish(&state);
    }

    /// Re-run the pure pipeline over the held catalog and publish the view.
    ///
    /// Scores with the committed query text, so typed text only shows up once
    /// the fetch for it has been accepted. Filter and sort apply immediately.
    fn publish(&self, state: &ControllerState) {
        let timer = Timer::start("search.render_ms");
        let query = QueryState {
            raw_query: state.committed_query.clone(),
            category_filter: state.query.category_filter.clone(),
            sort_mode: state.query.sort_mode,
        };
        let results = state
            .catalog
            .search(&query, &self.config.weights, self.config.max_results);
        timer.stop();

        let view = SearchView {
            results,
            facets: state.catalog.facets().to_vec(),
            is_loading: state.phase == Phase::Fetching,
            error: state.error.clone(),
            phase: state.phase,
            failed_sources: state.failed_sources.clone(),
            epoch: state.settled_epoch,
        };
        self.view.send_replace(Arc::new(view));
    }
}

/// Text hint passed to the sources: the trimmed query, or nothing.
fn fetch_hint(raw_query: &str) -> Option<String> {
    let trimmed = raw_query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Source whose responses and latencies are keyed by the hint.
    #[derive(Default)]
    struct ScriptedSource {
        menu: HashMap<String, Vec<RawMenuItem>>,
        restaurants: Vec<RawRestaurant>,
        delays_ms: HashMap<String, u64>,
        fail_menu: AtomicBool,
        fail_restaurants: AtomicBool,
        menu_calls: AtomicUsize,
        hints: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn delay(&self, hint: Option<&str>) -> Duration {
            let ms = self.delays_ms.get(hint.unwrap_or("")).copied().unwrap_or(10);
            Duration::from_millis(ms)
        }
    }

    impl CatalogSource for ScriptedSource {
        async fn fetch_menu_items(&self, hint: Option<&str>) -> Result<Vec<RawMenuItem>> {
            self.menu_calls.fetch_add(1, Ordering::SeqCst);
            self.hints.lock().unwrap().push(hint.map(String::from));
            tokio::time::sleep(self.delay(hint)).await;
            if self.fail_menu.load(Ordering::SeqCst) {
                return Err(SearchError::fetch_failed(SourceKind::Menu, "HTTP 503"));
            }
            Ok(self.menu.get(hint.unwrap_or("")).cloned().unwrap_or_default())
        }

        async fn fetch_restaurants(&self, hint: Option<&str>) -> Result<Vec<RawRestaurant>> {
            tokio::time::sleep(self.delay(hint)).await;
            if self.fail_restaurants.load(Ordering::SeqCst) {
                return Err(SearchError::fetch_failed(SourceKind::Restaurants, "HTTP 500"));
            }
            Ok(self.restaurants.clone())
        }
    }

    fn items(value: serde_json::Value) -> Vec<RawMenuItem> {
        serde_json::from_value(value).unwrap()
    }

    fn restaurants(value: serde_json::Value) -> Vec<RawRestaurant> {
        serde_json::from_value(value).unwrap()
    }

    fn ids(view: &SearchView) -> Vec<String> {
        view.results.iter().map(|r| r.id.clone()).collect()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1_000)).await;
    }

    fn burger_source() -> ScriptedSource {
        let mut source = ScriptedSource::default();
        source.menu.insert(
            String::new(),
            items(serde_json::json!([
                {"id": "b1", "name": "Classic Burger", "price": 210, "category": "Burgers", "eta": "40"},
                {"id": "w1", "name": "Chicken Wrap", "price": 140, "category": "Wraps", "eta": "15"},
                {"id": "b2", "name": "Smash Burger", "price": 190, "category": "Burgers", "eta": "25"},
                {"id": "b3", "name": "Veggie Burger", "price": 170, "category": "Burgers", "eta": "25"}
            ])),
        );
        source
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_is_idle() {
        let controller = QueryController::new(ScriptedSource::default(), EngineConfig::default());
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.raw_query(), "");
        assert_eq!(controller.sort_mode(), SortMode::Relevance);
        assert!(controller.category_filter().is_none());
        assert!(controller.results().is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_loads_catalog() {
        let controller = QueryController::new(burger_source(), EngineConfig::default());
        controller.refetch();
        assert!(controller.is_loading());
        assert_eq!(controller.phase(), Phase::Fetching);

        settle().await;
        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Settled);
        assert!(!view.is_loading);
        assert_eq!(view.results.len(), 4);
        assert_eq!(view.facets[0].name, "Burgers");
        assert_eq!(view.facets[0].count, 3);
        assert_eq!(view.epoch, 1);
        assert!(metrics().gauge_value("search.catalog.records").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_category_baseline() {
        let controller = QueryController::new(burger_source(), EngineConfig::default());
        controller.refetch();
        settle().await;

        controller.set_category(Some("burgers".to_string()));
        // baseline score for all, ETA tie-break, catalog order among equals
        assert_eq!(ids(&controller.snapshot()), vec!["b2", "b3", "b1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sort_and_category_do_not_fetch() {
        let source = Arc::new(burger_source());
        let controller = QueryController::new(Arc::clone(&source), EngineConfig::default());
        controller.refetch();
        settle().await;
        assert_eq!(source.menu_calls.load(Ordering::SeqCst), 1);

        controller.set_sort(SortMode::Price);
        assert_eq!(ids(&controller.snapshot()), vec!["w1", "b3", "b2", "b1"]);

        controller.set_category(Some("wraps".to_string()));
        assert_eq!(ids(&controller.snapshot()), vec!["w1"]);

        settle().await;
        assert_eq!(source.menu_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_keystrokes() {
        let source = Arc::new(burger_source());
        let controller = QueryController::new(Arc::clone(&source), EngineConfig::default());

        for text in ["b", "bu", "bur", "burg"] {
            controller.set_query(text);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(source.menu_calls.load(Ordering::SeqCst), 0);

        settle().await;
        assert_eq!(source.menu_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*source.hints.lock().unwrap(), vec![Some("burg".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let mut source = ScriptedSource::default();
        source.menu.insert("a".into(), items(serde_json::json!([{"id": "slow", "name": "Abla Mantı"}])));
        source.menu.insert("ab".into(), items(serde_json::json!([{"id": "fast", "name": "Abant Kebap"}])));
        source.delays_ms.insert("a".into(), 500);
        source.delays_ms.insert("ab".into(), 50);

        let controller = QueryController::new(source, EngineConfig::default());
        let mut rx = controller.subscribe();
        let published = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&published);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let view = rx.borrow_and_update().clone();
                sink.lock().unwrap().push(ids(&view));
            }
        });

        // "a" dispatches at 200ms and answers at 700ms
        controller.set_query("a");
        tokio::time::sleep(Duration::from_millis(210)).await;
        assert_eq!(controller.phase(), Phase::Fetching);

        // "ab" dispatches at 410ms and answers at 460ms
        controller.set_query("ab");
        tokio::time::sleep(Duration::from_millis(300)).await;
        let view = controller.snapshot();
        assert_eq!(ids(&view), vec!["fast"]);
        assert_eq!(view.epoch, 2);

        // let the slow "a" response arrive
        tokio::time::sleep(Duration::from_millis(500)).await;
        let view = controller.snapshot();
        assert_eq!(ids(&view), vec!["fast"]);
        assert_eq!(view.epoch, 2);
        assert_eq!(view.phase, Phase::Settled);

        let published = published.lock().unwrap();
        assert!(published.iter().all(|ids| !ids.contains(&"slow".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_uses_remaining_source() {
        let source = ScriptedSource {
            restaurants: restaurants(serde_json::json!([
                {"id": "r1", "name": "Burger Lab"},
                {"id": "r2", "name": "Pide Salonu"}
            ])),
            ..Default::default()
        };
        source.fail_menu.store(true, Ordering::SeqCst);

        let controller = QueryController::new(source, EngineConfig::default());
        controller.refetch();
        settle().await;

        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Settled);
        assert!(view.results.is_empty());
        assert!(view.facets.is_empty());
        assert!(view.error.is_none());
        assert_eq!(view.failed_sources, vec![SourceKind::Menu]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_failure_then_recovery() {
        let source = Arc::new(burger_source());
        source.fail_menu.store(true, Ordering::SeqCst);
        source.fail_restaurants.store(true, Ordering::SeqCst);

        let controller = QueryController::new(Arc::clone(&source), EngineConfig::default());
        controller.refetch();
        settle().await;

        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Errored);
        assert!(view.results.is_empty());
        let error = view.error.clone().unwrap();
        assert!(error.contains("menu source failed"));
        assert!(error.contains("restaurants source failed"));

        source.fail_menu.store(false, Ordering::SeqCst);
        source.fail_restaurants.store(false, Ordering::SeqCst);
        controller.refetch();
        settle().await;

        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Settled);
        assert!(view.error.is_none());
        assert_eq!(view.results.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_counts_as_failure() {
        let mut source = burger_source();
        source.delays_ms.insert(String::new(), 60_000);

        let config = EngineConfig::default().with_fetch_timeout(Some(Duration::from_millis(500)));
        let controller = QueryController::new(source, config);
        controller.refetch();
        settle().await;

        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Errored);
        assert!(view.error.as_deref().unwrap().contains("timed out after 500ms"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_ranks_results() {
        let mut source = burger_source();
        let catalog = source.menu[""].clone();
        source.menu.insert("smash".into(), catalog);

        let controller = QueryController::new(source, EngineConfig::default().with_max_results(Some(5)));
        controller.set_query("smash");
        settle().await;

        assert_eq!(controller.raw_query(), "smash");
        assert_eq!(ids(&controller.snapshot()), vec!["b2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_text_waits_for_its_fetch() {
        let mut source = burger_source();
        let catalog = source.menu[""].clone();
        source.menu.insert("wrap".into(), catalog);
        source.delays_ms.insert("wrap".into(), 300);

        let controller = QueryController::new(source, EngineConfig::default());
        controller.refetch();
        settle().await;
        assert_eq!(controller.results().len(), 4);

        // pending debounce: sort change re-ranks with the previous text
        controller.set_query("wrap");
        controller.set_sort(SortMode::Relevance);
        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Settled);
        assert_eq!(view.results.len(), 4);
        assert_eq!(controller.raw_query(), "wrap");

        // dispatched but not answered yet
        tokio::time::sleep(Duration::from_millis(250)).await;
        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Fetching);
        assert_eq!(view.results.len(), 4);

        settle().await;
        let view = controller.snapshot();
        assert_eq!(view.phase, Phase::Settled);
        assert_eq!(ids(&view), vec!["w1"]);
    }

    #[test]
    fn test_fetch_hint() {
        assert_eq!(fetch_hint("  pide "), Some("pide".to_string()));
        assert_eq!(fetch_hint("   "), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_debounce_and_fetch() {
        let mut source = burger_source();
        let catalog = source.menu[""].clone();
        source.menu.insert("veggie".into(), catalog);
        source.delays_ms.insert("veggie".into(), 300);

        let controller = QueryController::new(source, EngineConfig::default());
        assert_eq!(controller.settled().await.phase, Phase::Idle);

        controller.set_query("veggie");
        let view = controller.settled().await;
        assert_eq!(view.phase, Phase::Settled);
        assert_eq!(ids(&view), vec!["b3"]);
        assert_eq!(view.epoch, 1);
    }
}
