pub mod cuisine;
pub mod types;

use ingest::CountryRow;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::processor::bronze::{CleanRecord, DataQualityIssue};
pub use cuisine::split_cuisines;
pub use types::{EnrichmentReport, PriceCategory, RateCategory, Restaurant, Snapshot};

/// Second layer: resolves country names and derives the categorical columns.
pub struct SilverProcessor {
    countries: HashMap<String, String>,
}

impl SilverProcessor {
    pub fn new(lookup: &[CountryRow]) -> Self {
        let mut countries = HashMap::with_capacity(lookup.len());
        for row in lookup {
            let code = row.code.trim().to_string();
            if let Some(existing) = countries.get(&code) {
                warn!(code = %code, kept = %existing, ignored = %row.name, "Duplicate country code in lookup");
                continue;
            }
            countries.insert(code, row.name.trim().to_string());
        }
        Self { countries }
    }

    pub fn country_name(&self, code: &str) -> Option<&str> {
        self.countries.get(code.trim()).map(String::as_str)
    }

    pub fn enrich(&self, rows: Vec<CleanRecord>) -> (Snapshot, EnrichmentReport) {
        let mut report = EnrichmentReport {
            input_rows: rows.len(),
            ..Default::default()
        };
        let mut restaurants = Vec::with_capacity(rows.len());

        for record in rows {
            let Some(country_name) = self.country_name(&record.country_code) else {
                debug!(row = record.row, id = %record.id, code = %record.country_code, "Country lookup miss");
                report.lookup_misses += 1;
                *report
                    .misses_by_code
                    .entry(record.country_code.clone())
                    .or_default() += 1;
                report.issues.push(DataQualityIssue::LookupMiss {
                    row: record.row,
                    id: record.id,
                    country_code: record.country_code,
                });
                continue;
            };

            restaurants.push(Restaurant {
                row: record.row,
                country_name: country_name.to_string(),
                cuisines: record
                    .cuisines
                    .as_deref()
                    .map(split_cuisines)
                    .unwrap_or_default(),
                rate_category: RateCategory::from_rating(record.rating),
                price_category: PriceCategory::from_price_range(record.price_range),
                id: record.id,
                name: record.name,
                country_code: record.country_code,
                city: record.city,
                locality: record.locality,
                rating: record.rating,
                votes: record.votes,
                average_cost_for_two: record.average_cost_for_two,
                price_range: record.price_range,
                has_online_delivery: record.has_online_delivery,
                has_table_booking: record.has_table_booking,
            });
        }

        report.output_rows = restaurants.len();
        let snapshot = Snapshot::new(restaurants);

        info!(
            input = report.input_rows,
            output = report.output_rows,
            lookup_misses = report.lookup_misses,
            countries = snapshot.by_country().len(),
            cities = snapshot.by_city().len(),
            cuisines = snapshot.by_cuisine().len(),
            "Silver enrichment complete"
        );

        (snapshot, report)
    }
}
