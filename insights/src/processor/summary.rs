use chrono::{DateTime, Utc};
use ingest::RawRecord;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::bronze::CleaningReport;
use super::gold::ViewCount;
use super::silver::EnrichmentReport;

/// Everything a run excluded or produced, written next to the views.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input_checksum: String,
    pub input_rows: usize,
    pub cleaning: CleaningReport,
    pub enrichment: EnrichmentReport,
    pub snapshot_rows: usize,
    pub views: Vec<ViewCount>,
}

impl RunSummary {
    /// Rows removed before the snapshot was built.
    pub fn excluded_rows(&self) -> usize {
        self.cleaning.dropped() + self.enrichment.lookup_misses
    }

    pub fn view(&self, name: &str) -> Option<&ViewCount> {
        self.views.iter().find(|count| count.view == name)
    }
}

/// SHA-256 over the raw rows in input order.
///
/// Each field contributes a presence byte before its bytes and a unit
/// separator after, so `None` and `Some("")` hash differently and values
/// cannot run into their neighbours.
pub fn input_checksum(rows: &[RawRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((rows.len() as u64).to_le_bytes());

    for row in rows {
        for value in row.values() {
            match value {
                Some(v) => {
                    hasher.update([1u8]);
                    hasher.update(v.as_bytes());
                }
                None => hasher.update([0u8]),
            }
            hasher.update([0x1f]);
        }
        hasher.update([0x1e]);
    }

    format!("{:x}", hasher.finalize())
}
