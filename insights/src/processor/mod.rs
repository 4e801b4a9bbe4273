pub mod bronze;
pub mod gold;
pub mod silver;
pub mod summary;

pub use bronze::{BronzeProcessor, CleaningReport};
pub use gold::{GoldProcessor, GoldViews, ViewCount, ViewOutput};
pub use silver::{EnrichmentReport, SilverProcessor, Snapshot};
pub use summary::{RunSummary, input_checksum};
