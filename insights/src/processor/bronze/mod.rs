pub mod coerce;
pub mod types;

use common::config::CleaningConfig;
use ingest::RawRecord;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use coerce::{MISSING, parse_cost, parse_flag, parse_price_range, parse_rating, parse_votes};
pub use types::{CleanRecord, CleaningReport, DataQualityIssue, Rating};

/// First layer: drops known-bad rows, repairs the city artifact and types
/// the numeric columns.
pub struct BronzeProcessor {
    denylist: HashSet<String>,
    excluded_ids: HashSet<String>,
    garbled: String,
    replacement: String,
}

impl BronzeProcessor {
    /// Expects a configuration that already passed `Settings::validate`.
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            denylist: config
                .country_code_denylist
                .iter()
                .map(|code| code.trim().to_string())
                .collect(),
            excluded_ids: config
                .excluded_ids
                .iter()
                .map(|id| id.trim().to_string())
                .collect(),
            garbled: config.city_fix.garbled.clone(),
            replacement: config.city_fix.replacement.clone(),
        }
    }

    pub fn clean(&self, rows: &[RawRecord]) -> (Vec<CleanRecord>, CleaningReport) {
        let mut report = CleaningReport {
            input_rows: rows.len(),
            ..Default::default()
        };
        let mut cleaned = Vec::with_capacity(rows.len());

        for (row, raw) in rows.iter().enumerate() {
            let Some(id) = present(raw.id.as_deref()) else {
                report.dropped_missing_key += 1;
                report.violations.push(violation(row, None, "id", None, MISSING));
                continue;
            };

            if self.excluded_ids.contains(id) {
                report.dropped_excluded += 1;
                debug!(row, id, "Dropped excluded id");
                continue;
            }

            let Some(country_code) = present(raw.country_code.as_deref()) else {
                report.dropped_missing_key += 1;
                report
                    .violations
                    .push(violation(row, Some(id), "country_code", None, MISSING));
                continue;
            };

            if self.denylist.contains(country_code) {
                report.dropped_denylisted += 1;
                debug!(row, id, country_code, "Dropped denylisted country code");
                continue;
            }

            let city = raw.city.as_deref().map(|city| {
                if city.contains(self.garbled.as_str()) {
                    report.city_fixes += 1;
                    city.replace(self.garbled.as_str(), &self.replacement)
                } else {
                    city.to_string()
                }
            });

            let mut coerced = Coercer {
                row,
                id,
                violations: &mut report.violations,
            };

            cleaned.push(CleanRecord {
                row,
                id: id.to_string(),
                name: raw.name.clone().unwrap_or_default(),
                country_code: country_code.to_string(),
                city,
                locality: raw.locality.clone(),
                cuisines: raw.cuisines.clone(),
                rating: coerced.field("rating", raw.rating.as_deref(), parse_rating),
                votes: coerced.field("votes", raw.votes.as_deref(), parse_votes),
                average_cost_for_two: coerced.field(
                    "average_cost_for_two",
                    raw.average_cost_for_two.as_deref(),
                    parse_cost,
                ),
                price_range: coerced.field(
                    "price_range",
                    raw.price_range.as_deref(),
                    parse_price_range,
                ),
                has_online_delivery: coerced.field(
                    "has_online_delivery",
                    raw.has_online_delivery.as_deref(),
                    parse_flag,
                ),
                has_table_booking: coerced.field(
                    "has_table_booking",
                    raw.has_table_booking.as_deref(),
                    parse_flag,
                ),
            });
        }

        report.duplicate_ids = duplicate_ids(&cleaned);
        report.output_rows = cleaned.len();

        info!(
            input = report.input_rows,
            output = report.output_rows,
            denylisted = report.dropped_denylisted,
            excluded = report.dropped_excluded,
            missing_key = report.dropped_missing_key,
            city_fixes = report.city_fixes,
            violations = report.violations.len(),
            duplicate_ids = report.duplicate_ids.len(),
            "Bronze cleaning complete"
        );

        (cleaned, report)
    }
}

struct Coercer<'a> {
    row: usize,
    id: &'a str,
    violations: &'a mut Vec<DataQualityIssue>,
}

impl Coercer<'_> {
    /// Absent stays absent; an unparsable value becomes absent and is recorded.
    fn field<T>(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
        parse: fn(&str) -> Result<T, &'static str>,
    ) -> Option<T> {
        let raw = raw?;
        match parse(raw) {
            Ok(value) => Some(value),
            Err(reason) => {
                debug!(row = self.row, id = self.id, field, value = raw, reason, "Coercion failed");
                self.violations
                    .push(violation(self.row, Some(self.id), field, Some(raw), reason));
                None
            }
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn violation(
    row: usize,
    id: Option<&str>,
    field: &'static str,
    value: Option<&str>,
    reason: &'static str,
) -> DataQualityIssue {
    DataQualityIssue::SchemaViolation {
        row,
        id: id.map(str::to_string),
        field,
        value: value.map(str::to_string),
        reason,
    }
}

fn duplicate_ids(records: &[CleanRecord]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.id.as_str()).or_default() += 1;
    }

    let mut reported = HashSet::new();
    records
        .iter()
        .map(|record| record.id.as_str())
        .filter(|id| counts.get(id).copied().unwrap_or(0) > 1 && reported.insert(*id))
        .map(str::to_string)
        .collect()
}
