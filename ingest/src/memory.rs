use async_trait::async_trait;
use common::Result;

use crate::RecordSource;
use crate::models::{CountryRow, RawRecord};

/// Source backed by rows already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    restaurants: Vec<RawRecord>,
    countries: Vec<CountryRow>,
}

impl MemorySource {
    pub fn new(restaurants: Vec<RawRecord>, countries: Vec<CountryRow>) -> Self {
        Self {
            restaurants,
            countries,
        }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn restaurants(&self) -> Result<Vec<RawRecord>> {
        Ok(self.restaurants.clone())
    }

    async fn countries(&self) -> Result<Vec<CountryRow>> {
        Ok(self.countries.clone())
    }

    fn describe(&self) -> String {
        format!(
            "memory({} restaurants, {} countries)",
            self.restaurants.len(),
            self.countries.len()
        )
    }
}
