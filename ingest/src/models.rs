use serde::{Deserialize, Serialize};

/// One restaurant row exactly as the source delivered it.
///
/// Every field is optional text; typing happens in the bronze layer so a bad
/// value can be reported against the row instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub cuisines: Option<String>,
    pub average_cost_for_two: Option<String>,
    pub price_range: Option<String>,
    pub rating: Option<String>,
    pub votes: Option<String>,
    pub has_online_delivery: Option<String>,
    pub has_table_booking: Option<String>,
}

impl RawRecord {
    /// Field values in a fixed order, used for fingerprinting a snapshot.
    pub fn values(&self) -> [Option<&str>; 12] {
        [
            self.id.as_deref(),
            self.name.as_deref(),
            self.country_code.as_deref(),
            self.city.as_deref(),
            self.locality.as_deref(),
            self.cuisines.as_deref(),
            self.average_cost_for_two.as_deref(),
            self.price_range.as_deref(),
            self.rating.as_deref(),
            self.votes.as_deref(),
            self.has_online_delivery.as_deref(),
            self.has_table_booking.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRow {
    pub code: String,
    pub name: String,
}

impl CountryRow {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Blank cells in the source are treated as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
