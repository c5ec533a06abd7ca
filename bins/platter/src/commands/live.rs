//! Interactive session driven by stdin
//!
//! Every input line is applied to one controller, so query edits go through
//! the same debounce and stale-response handling as keystrokes in a UI.

use crate::output::{self, Status};
use crate::settings::Settings;
use crate::source::CliSource;
use anyhow::Result;
use owo_colors::OwoColorize;
use platter_search::{CatalogSource, Phase, QueryController, SearchView, SortMode};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, PartialEq)]
enum Input {
    Query(String),
    Sort(SortMode),
    Category(Option<String>),
    Quit,
}

fn parse_line(line: &str) -> std::result::Result<Input, String> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Query(line.to_string()));
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command.trim(), ""), |(n, a)| (n, a.trim()));

    match name {
        "sort" => arg.parse().map(Input::Sort),
        "category" | "cat" => Ok(Input::Category((!arg.is_empty()).then(|| arg.to_string()))),
        "quit" | "q" => Ok(Input::Quit),
        other => Err(format!("unknown command :{other}")),
    }
}

fn apply<S: CatalogSource>(controller: &QueryController<S>, input: Input) {
    match input {
        Input::Query(text) => controller.set_query(text),
        Input::Sort(mode) => controller.set_sort(mode),
        Input::Category(category) => controller.set_category(category),
        Input::Quit => {}
    }
}

pub async fn run(source: CliSource, settings: &Settings, limit: usize, json: bool) -> Result<()> {
    let controller = QueryController::new(source, settings.engine.clone());
    let mut rx = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !json {
        Status::info("Type to search; :sort, :category and :quit control the session");
    }

    // Load the unfiltered catalog so facet and sort commands work before typing.
    controller.refetch();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => apply(&controller, input),
                    Err(message) => Status::warning(&message),
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = rx.borrow_and_update().clone();
                if !view.is_loading && view.phase != Phase::Idle {
                    render(&controller, &view, limit, json)?;
                }
            }
        }
    }

    let view = controller.settled().await;
    if rx.has_changed().unwrap_or(false) {
        render(&controller, &view, limit, json)?;
    }
    Ok(())
}

fn render<S: CatalogSource>(
    controller: &QueryController<S>,
    view: &SearchView,
    limit: usize,
    json: bool,
) -> Result<()> {
    let state = controller.query_state();
    let shown = &view.results[..view.results.len().min(limit)];

    if json {
        let line = serde_json::json!({
            "query": state.raw_query,
            "category": state.category_filter,
            "sort": state.sort_mode,
            "phase": view.phase,
            "epoch": view.epoch,
            "error": view.error,
            "failed_sources": view.failed_sources,
            "total": view.results.len(),
            "results": shown,
        });
        println!("{line}");
        return Ok(());
    }

    println!();
    println!(
        "{} {}  {}{}",
        "»".cyan(),
        format!("\"{}\"", state.raw_query).bold(),
        format!("sort: {}", state.sort_mode).dimmed(),
        state
            .category_filter
            .as_deref()
            .map(|c| format!("  category: {c}").dimmed().to_string())
            .unwrap_or_default()
    );

    if let Some(error) = &view.error {
        Status::error(error);
        return Ok(());
    }
    output::report_partial_failure(view);
    output::print_results(shown);
    if view.results.len() > shown.len() {
        println!("     {}", format!("… {} more", view.results.len() - shown.len()).dimmed());
    }
    Ok(())
}
