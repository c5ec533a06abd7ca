//! One-shot search

use crate::output::{self, Status};
use crate::settings::Settings;
use crate::source::CliSource;
use anyhow::Result;
use platter_search::{
    CatalogSource, EnrichedResult, QueryController, SearchView, SortMode, SourceKind,
};
use serde::Serialize;
use std::sync::Arc;

pub struct SearchRequest {
    pub query: String,
    pub category: Option<String>,
    pub sort: SortMode,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Run the query to completion; a total source failure becomes an error.
async fn execute<S: CatalogSource>(
    source: S,
    settings: &Settings,
    request: &SearchRequest,
) -> Result<Arc<SearchView>> {
    let mut engine = settings.engine.clone();
    if request.limit.is_some() {
        engine = engine.with_max_results(request.limit);
    }

    let controller = QueryController::new(source, engine);
    controller.set_category(request.category.clone());
    controller.set_sort(request.sort);
    controller.set_query(request.query.as_str());
    controller.refetch();

    let view = controller.settled().await;
    if let Some(error) = &view.error {
        return Err(platter_core::Error::source_unavailable(error.clone()).into());
    }
    Ok(view)
}

fn json_output<'a>(request: &'a SearchRequest, view: &'a SearchView) -> JsonSearchOutput<'a> {
    JsonSearchOutput {
        query: &request.query,
        category: request.category.as_deref(),
        sort: request.sort,
        total: view.results.len(),
        failed_sources: &view.failed_sources,
        results: &view.results,
    }
}

#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    query: &'a str,
    category: Option<&'a str>,
    sort: SortMode,
    total: usize,
    failed_sources: &'a [SourceKind],
    results: &'a [EnrichedResult],
}

pub async fn run(source: CliSource, settings: &Settings, request: SearchRequest) -> Result<()> {
    let spinner = (!request.json).then(|| output::spinner("Searching…"));
    let view = execute(source, settings, &request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let view = view?;

    if request.json {
        println!("{}", serde_json::to_string_pretty(&json_output(&request, &view))?);
        return Ok(());
    }

    output::report_partial_failure(&view);

    let title = if request.query.trim().is_empty() {
        "All items".to_string()
    } else {
        format!("Results for \"{}\"", request.query.trim())
    };
    Status::header(&title);
    output::print_results(&view.results);
    println!();
    Status::info(&format!(
        "{} result(s), sorted by {}{}",
        view.results.len(),
        request.sort,
        request
            .category
            .as_deref()
            .map(|c| format!(", category \"{c}\""))
            .unwrap_or_default()
    ));
    Ok(())
}
