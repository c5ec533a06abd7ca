//! Platter CLI - live catalog search from the terminal
//!
//! Searches either a local JSON catalog (`--catalog`) or the catalog API
//! configured through `platter.toml` and `PLATTER_*` environment variables.

use clap::{Args, Parser, Subcommand};
use platter_core::error::exit_codes;
use platter_search::SortMode;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;
mod settings;
mod source;

use settings::Settings;

/// Live catalog search with typo tolerance, facets and sorting
#[derive(Parser)]
#[command(name = "platter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to platter.toml (default: discovered in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Search a local JSON catalog instead of the catalog API
    #[arg(long, global = true, env = "PLATTER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print collected metrics as JSON on stderr before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the ranked results
    Search(SearchArgs),

    /// List category facets with item counts
    Facets {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Read queries from stdin and print each settled result set
    ///
    /// Plain lines replace the query text. `:sort <relevance|price|eta>`,
    /// `:category <label>`, `:category` (clear) and `:quit` control the session.
    Live {
        /// Results to show per update
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Print one JSON object per update
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Query text; empty lists the whole catalog
    #[arg(default_value = "")]
    query: String,

    /// Only show items in a category (case and accent insensitive)
    #[arg(short = 'C', long)]
    category: Option<String>,

    /// Result order
    #[arg(short, long, default_value = "relevance")]
    sort: SortMode,

    /// Maximum number of results
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let print_metrics = cli.metrics;
    let json = cli.command.json();

    let result = run(cli).await;

    if print_metrics {
        eprintln!("{}", platter_telemetry::metrics().export_json());
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::report_error(&e, json);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

impl Commands {
    /// Whether the command writes JSON to stdout, failures included
    fn json(&self) -> bool {
        match self {
            Commands::Search(args) => args.json,
            Commands::Facets { json } | Commands::Live { json, .. } => *json,
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref(), cli.verbose)?;
    platter_telemetry::init_with_config(settings.telemetry.clone())?;

    if let Some(path) = &settings.config_path {
        tracing::debug!(path = %path.display(), "loaded configuration");
    }

    let source = source::open(cli.catalog.as_deref(), &settings)?;

    match cli.command {
        Commands::Search(args) => {
            let request = commands::search::SearchRequest {
                query: args.query,
                category: args.category,
                sort: args.sort,
                limit: args.limit,
                json: args.json,
            };
            commands::search::run(source, &settings, request).await
        }
        Commands::Facets { json } => commands::facets::run(source, &settings, json).await,
        Commands::Live { limit, json } => commands::live::run(source, &settings, limit, json).await,
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<platter_core::Error>()
        .map_or(exit_codes::FAILURE, |e| e.code.exit_code());
    u8::try_from(code).unwrap_or(1)
}
