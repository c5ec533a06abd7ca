//! Category facets over the whole catalog

use crate::output::{self, Status};
use crate::settings::Settings;
use crate::source::CliSource;
use anyhow::Result;
use platter_search::QueryController;

pub async fn run(source: CliSource, settings: &Settings, json: bool) -> Result<()> {
    let controller = QueryController::new(source, settings.engine.clone());
    controller.refetch();
    let view = controller.settled().await;

    if let Some(error) = &view.error {
        return Err(platter_core::Error::source_unavailable(error.clone()).into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view.facets)?);
        return Ok(());
    }

    output::report_partial_failure(&view);
    Status::header("Categories");
    output::print_facets(&view.facets);
    Ok(())
}
