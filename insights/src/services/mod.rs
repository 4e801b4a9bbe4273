pub mod pipeline;

pub use pipeline::{InsightsService, PipelineOutput};
