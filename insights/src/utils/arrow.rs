use arrow::json::ReaderBuilder;
use arrow::json::reader::infer_json_schema_from_iterator;
use arrow::record_batch::RecordBatch;
use common::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

const BATCH_SIZE: usize = 8192;

/// Converts serializable rows to record batches, inferring the schema from
/// the rows themselves. No rows means no batches.
pub fn rows_to_batches<T: Serialize>(rows: &[T]) -> Result<Vec<RecordBatch>> {
    let values = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<Value>, _>>()?;

    if values.is_empty() {
        return Ok(Vec::new());
    }

    let schema = infer_json_schema_from_iterator(values.iter().map(Ok))?;
    let mut decoder = ReaderBuilder::new(Arc::new(schema))
        .with_batch_size(BATCH_SIZE)
        .build_decoder()?;

    let mut batches = Vec::new();
    for chunk in values.chunks(BATCH_SIZE) {
        decoder.serialize(chunk)?;
        if let Some(batch) = decoder.flush()? {
            batches.push(batch);
        }
    }
    Ok(batches)
}
