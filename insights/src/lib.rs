pub mod export;
pub mod logging;
pub mod processor;
pub mod services;
pub mod utils;

use common::Result;
use common::config::Settings;
use ingest::CsvSource;
use std::sync::Arc;
use tracing::info;

use export::ViewExporter;
use processor::RunSummary;
use services::InsightsService;

/// Runs the CSV-backed pipeline and exports every view.
pub async fn run_insights_pipeline(settings: &Settings) -> Result<RunSummary> {
    let source = Arc::new(CsvSource::new(settings));
    let service = InsightsService::new(settings, source)?;

    let output = service.run().await?;

    let exporter = ViewExporter::new(&settings.output);
    let written = exporter.export(&output.views, &output.summary)?;
    info!(files = written.len(), dir = %exporter.dir().display(), "Views exported");

    Ok(output.summary)
}
