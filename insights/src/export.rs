use common::Result;
use common::config::{OutputConfig, OutputFormat};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::processor::{GoldViews, RunSummary, ViewOutput};
use crate::utils::arrow::rows_to_batches;

pub const SUMMARY_FILE: &str = "run_summary.json";

/// Writes every view, then the run summary, into one directory.
pub struct ViewExporter {
    dir: PathBuf,
    format: OutputFormat,
}

impl ViewExporter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            format: config.format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the paths written, summary last.
    pub fn export(&self, views: &GoldViews, summary: &RunSummary) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let written = [
            self.write_view("market_penetration", &views.market_penetration)?,
            self.write_view("locality_performance", &views.locality_performance)?,
            self.write_view("cuisine_performance", &views.cuisine_performance)?,
            self.write_view("service_correlation", &views.service_correlation)?,
            self.write_view("rolling_contribution", &views.rolling_contribution)?,
            self.write_view("competitive_ranking", &views.competitive_ranking)?,
            self.write_view("opportunity_scoring", &views.opportunity_scoring)?,
            self.write_view("success_scoring", &views.success_scoring)?,
        ];
        let mut paths: Vec<PathBuf> = written.into_iter().flatten().collect();

        let summary_path = self.dir.join(SUMMARY_FILE);
        write_json(&summary_path, summary)?;
        paths.push(summary_path);

        info!(dir = %self.dir.display(), files = paths.len(), "Export complete");
        Ok(paths)
    }

    fn write_view<T: Serialize>(&self, name: &str, view: &ViewOutput<T>) -> Result<Option<PathBuf>> {
        match self.format {
            OutputFormat::Json => {
                let path = self.dir.join(format!("{name}.json"));
                write_json(&path, &view.rows)?;
                debug!(view = name, path = %path.display(), rows = view.rows.len(), "Wrote view");
                Ok(Some(path))
            }
            OutputFormat::Parquet => {
                let batches = rows_to_batches(&view.rows)?;
                let Some(first) = batches.first() else {
                    debug!(view = name, "View is empty, no parquet file written");
                    return Ok(None);
                };

                let path = self.dir.join(format!("{name}.parquet"));
                let file = File::create(&path)?;
                let props = WriterProperties::builder().build();
                let mut writer = ArrowWriter::try_new(file, first.schema(), Some(props))?;
                for batch in &batches {
                    writer.write(batch)?;
                }
                writer.close()?;

                debug!(view = name, path = %path.display(), rows = view.rows.len(), "Wrote view");
                Ok(Some(path))
            }
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
