pub mod csv;
pub mod memory;
pub mod models;

pub use csv::CsvSource;
pub use memory::MemorySource;
pub use models::{CountryRow, RawRecord};

use async_trait::async_trait;
use common::Result;

/// Supplies the restaurant table and the country lookup for one run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn restaurants(&self) -> Result<Vec<RawRecord>>;

    async fn countries(&self) -> Result<Vec<CountryRow>>;

    fn describe(&self) -> String;
}
