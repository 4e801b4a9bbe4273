use arrow::array::{Array, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use common::config::{ColumnMapping, CountryColumns, Settings};
use common::{Error, Result};
use datafusion::prelude::{CsvReadOptions, SessionContext};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::RecordSource;
use crate::models::{CountryRow, RawRecord, non_blank};

/// Reads the restaurant table and the country lookup from delimited files.
///
/// Every column is loaded as text: the header is read first, then the file
/// is read again against an all-`Utf8` schema so that numeric-looking columns
/// with stray values never fail the load.
pub struct CsvSource {
    ctx: Arc<SessionContext>,
    restaurants_path: String,
    countries_path: String,
    delimiter: u8,
    columns: ColumnMapping,
    country_columns: CountryColumns,
}

impl CsvSource {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ctx: Arc::new(SessionContext::new()),
            restaurants_path: settings.source.restaurants_path.clone(),
            countries_path: settings.source.countries_path.clone(),
            delimiter: settings.delimiter_byte(),
            columns: settings.source.columns.clone(),
            country_columns: settings.source.country_columns.clone(),
        }
    }

    fn read_options<'a>(&self, extension: &'a str) -> CsvReadOptions<'a> {
        CsvReadOptions::new()
            .has_header(true)
            .delimiter(self.delimiter)
            .file_extension(extension)
    }

    async fn load_text_columns(
        &self,
        path: &str,
        wanted: &[&str],
    ) -> Result<Vec<Vec<Option<String>>>> {
        let extension = file_extension(path);

        let header = self.ctx.read_csv(path, self.read_options(&extension)).await?;
        let text_fields: Vec<Field> = header
            .schema()
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect();
        let text_schema = Schema::new(text_fields);

        let indices = wanted
            .iter()
            .map(|name| {
                text_schema.index_of(name).map_err(|_| {
                    Error::SchemaMismatch(format!("{} has no column named {:?}", path, name))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let df = self
            .ctx
            .read_csv(path, self.read_options(&extension).schema(&text_schema))
            .await?;
        let batches = df.collect().await?;

        let mut rows = Vec::new();
        for batch in &batches {
            let columns = indices
                .iter()
                .map(|&idx| text_column(batch, idx))
                .collect::<Result<Vec<_>>>()?;

            for row_idx in 0..batch.num_rows() {
                rows.push(
                    columns
                        .iter()
                        .map(|column| {
                            if column.is_null(row_idx) {
                                None
                            } else {
                                Some(column.value(row_idx).to_string())
                            }
                        })
                        .collect(),
                );
            }
        }

        debug!(path, rows = rows.len(), batches = batches.len(), "Loaded text columns");
        Ok(rows)
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    async fn restaurants(&self) -> Result<Vec<RawRecord>> {
        let c = &self.columns;
        let wanted = [
            c.id.as_str(),
            c.name.as_str(),
            c.country_code.as_str(),
            c.city.as_str(),
            c.locality.as_str(),
            c.cuisines.as_str(),
            c.average_cost_for_two.as_str(),
            c.price_range.as_str(),
            c.rating.as_str(),
            c.votes.as_str(),
            c.has_online_delivery.as_str(),
            c.has_table_booking.as_str(),
        ];

        let rows = self.load_text_columns(&self.restaurants_path, &wanted).await?;
        let records: Vec<RawRecord> = rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter();
                let mut next = || non_blank(cells.next().flatten().as_deref());
                RawRecord {
                    id: next(),
                    name: next(),
                    country_code: next(),
                    city: next(),
                    locality: next(),
                    cuisines: next(),
                    average_cost_for_two: next(),
                    price_range: next(),
                    rating: next(),
                    votes: next(),
                    has_online_delivery: next(),
                    has_table_booking: next(),
                }
            })
            .collect();

        info!(path = %self.restaurants_path, rows = records.len(), "Read restaurant table");
        Ok(records)
    }

    async fn countries(&self) -> Result<Vec<CountryRow>> {
        let wanted = [
            self.country_columns.code.as_str(),
            self.country_columns.name.as_str(),
        ];
        let rows = self.load_text_columns(&self.countries_path, &wanted).await?;

        let (countries, skipped) = country_rows(rows);
        if skipped > 0 {
            warn!(path = %self.countries_path, skipped, "Skipped country lookup rows with a blank code or name");
        }

        info!(path = %self.countries_path, rows = countries.len(), "Read country lookup");
        Ok(countries)
    }

    fn describe(&self) -> String {
        format!("csv({}, {})", self.restaurants_path, self.countries_path)
    }
}

/// Lookup rows with both a code and a name, plus how many were not.
fn country_rows(rows: Vec<Vec<Option<String>>>) -> (Vec<CountryRow>, usize) {
    let total = rows.len();
    let countries: Vec<CountryRow> = rows
        .into_iter()
        .filter_map(|row| {
            let mut cells = row.into_iter();
            let code = non_blank(cells.next().flatten().as_deref())?;
            let name = non_blank(cells.next().flatten().as_deref())?;
            Some(CountryRow { code, name })
        })
        .collect();
    let skipped = total - countries.len();
    (countries, skipped)
}

fn text_column(batch: &RecordBatch, idx: usize) -> Result<StringArray> {
    let array = cast(batch.column(idx), &DataType::Utf8)?;
    array
        .as_string_opt::<i32>()
        .cloned()
        .ok_or_else(|| Error::Other(format!("Column {} did not cast to Utf8", idx)))
}

fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
