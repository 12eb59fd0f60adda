use connectors::{ExecutorError, StoreError};
use model::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the pipeline file: {0}")]
    PipelineRead(#[from] std::io::Error),

    #[error("Failed to parse the pipeline file as JSON: {0}")]
    PipelineParse(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Pipeline cannot be saved: {0}")]
    Validation(#[from] ValidationError),

    #[error("Filter store error: {0}")]
    Store(#[from] StoreError),

    #[error("Query failed: {0}")]
    Query(#[from] ExecutorError),
}
