use serde::{Serialize, Serializer};
use std::fmt;

/// A rating with exactly one fractional digit, stored as tenths (0..=50).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MAX_TENTHS: u8 = 50;

    pub fn from_tenths(tenths: u8) -> Option<Self> {
        (tenths <= Self::MAX_TENTHS).then_some(Self(tenths))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// A row-level data-quality finding. Never fatal; always counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityIssue {
    SchemaViolation {
        row: usize,
        id: Option<String>,
        field: &'static str,
        value: Option<String>,
        reason: &'static str,
    },
    LookupMiss {
        row: usize,
        id: String,
        country_code: String,
    },
}

/// A row after cleaning and coercion. `row` is its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub row: usize,
    pub id: String,
    pub name: String,
    pub country_code: String,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub cuisines: Option<String>,
    pub rating: Option<Rating>,
    pub votes: Option<u32>,
    pub average_cost_for_two: Option<f64>,
    pub price_range: Option<u8>,
    pub has_online_delivery: Option<bool>,
    pub has_table_booking: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped_denylisted: usize,
    pub dropped_excluded: usize,
    pub dropped_missing_key: usize,
    pub city_fixes: usize,
    /// Ids seen on more than one surviving row, in first-seen order.
    pub duplicate_ids: Vec<String>,
    pub violations: Vec<DataQualityIssue>,
}

impl CleaningReport {
    pub fn dropped(&self) -> usize {
        self.dropped_denylisted + self.dropped_excluded + self.dropped_missing_key
    }
}
