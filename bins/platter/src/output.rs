//! Terminal output utilities

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use platter_core::error::ErrorReport;
use platter_search::{EnrichedResult, SearchCategory, SearchView};
use std::time::Duration;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Format a price with two decimals and a currency sign.
pub fn format_price(price: f64) -> String {
    if price <= 0.0 {
        return "—".to_string();
    }
    format!("₺{price:.2}")
}

/// Format a rating like `4.6 (1.2k)`.
pub fn format_rating(rating: Option<f64>, reviews: Option<u64>) -> String {
    let Some(rating) = rating else {
        return String::new();
    };
    match reviews {
        Some(n) if n >= 1000 => format!("★ {rating:.1} ({:.1}k)", n as f64 / 1000.0),
        Some(n) => format!("★ {rating:.1} ({n})"),
        None => format!("★ {rating:.1}"),
    }
}

/// One result per line: name, restaurant, price, ETA, rating.
pub fn print_results(results: &[EnrichedResult]) {
    if results.is_empty() {
        println!("  {}", "No results".dimmed());
        return;
    }

    for (rank, result) in results.iter().enumerate() {
        let restaurant = result.restaurant_name.as_deref().unwrap_or("");
        println!(
            "{:>3}. {}  {}  {}  {}  {}",
            rank + 1,
            result.name.bold(),
            restaurant.dimmed(),
            format_price(result.price).green(),
            format!("{} min", result.eta_minutes).cyan(),
            format_rating(result.rating, result.review_count).yellow()
        );
        if !result.categories.is_empty() {
            println!("     {}", result.categories.join(" · ").dimmed());
        }
    }
}

/// Facet chips with counts.
pub fn print_facets(facets: &[SearchCategory]) {
    if facets.is_empty() {
        println!("  {}", "No categories".dimmed());
        return;
    }
    let width = facets.iter().map(|f| f.name.chars().count()).max().unwrap_or(0);
    for facet in facets {
        let pad = width - facet.name.chars().count();
        println!(
            "  {}{}  {:>4}  {}",
            facet.name,
            " ".repeat(pad),
            facet.count.bold(),
            facet.id.dimmed()
        );
    }
}

/// Warn about sources that failed while others still answered.
pub fn report_partial_failure(view: &SearchView) {
    if view.error.is_none() && !view.failed_sources.is_empty() {
        let names: Vec<String> = view.failed_sources.iter().map(ToString::to_string).collect();
        Status::warning(&format!(
            "Results may be incomplete: {} unavailable",
            names.join(", ")
        ));
    }
}

/// Structured report for a failure raised as a `platter_core::Error`.
pub fn error_report(err: &anyhow::Error) -> Option<ErrorReport> {
    err.downcast_ref::<platter_core::Error>()
        .map(platter_core::Error::to_report)
}

/// Print a failure: a JSON report on stdout in `--json` mode, a status line otherwise.
pub fn report_error(err: &anyhow::Error, json: bool) {
    if json {
        if let Some(report) = error_report(err) {
            match serde_json::to_string_pretty(&report) {
                Ok(body) => println!("{body}"),
                Err(_) => Status::error(&err.to_string()),
            }
            return;
        }
    }
    Status::error(&err.to_string());
}
