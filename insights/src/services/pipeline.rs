use chrono::Utc;
use common::Result;
use common::config::Settings;
use ingest::RecordSource;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::processor::{
    BronzeProcessor, GoldProcessor, GoldViews, RunSummary, SilverProcessor, input_checksum,
};

/// Result of one complete run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub views: GoldViews,
    pub summary: RunSummary,
}

/// Drives a source through the bronze, silver and gold layers.
pub struct InsightsService {
    source: Arc<dyn RecordSource>,
    bronze: BronzeProcessor,
    gold: GoldProcessor,
}

impl InsightsService {
    /// Fails with `Error::Configuration` before anything is read if the
    /// settings are unusable.
    pub fn new(settings: &Settings, source: Arc<dyn RecordSource>) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            source,
            bronze: BronzeProcessor::new(&settings.cleaning),
            gold: GoldProcessor::new(&settings.analysis),
        })
    }

    pub async fn run(&self) -> Result<PipelineOutput> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let source = self.source.describe();
        info!(%run_id, %source, "Starting insights run");

        let (raw, countries) = tokio::try_join!(self.source.restaurants(), self.source.countries())?;
        info!(restaurants = raw.len(), countries = countries.len(), "Source loaded");
        let checksum = input_checksum(&raw);

        let (cleaned, cleaning) = self.bronze.clean(&raw);
        let (snapshot, enrichment) = SilverProcessor::new(&countries).enrich(cleaned);
        let snapshot_rows = snapshot.len();

        let views = self.gold.compute(Arc::new(snapshot)).await?;

        let summary = RunSummary {
            run_id,
            source,
            started_at,
            finished_at: Utc::now(),
            input_checksum: checksum,
            input_rows: raw.len(),
            cleaning,
            enrichment,
            snapshot_rows,
            views: views.counts(),
        };
        info!(
            %run_id,
            snapshot_rows,
            excluded = summary.excluded_rows(),
            "Insights run finished"
        );

        Ok(PipelineOutput { views, summary })
    }
}
