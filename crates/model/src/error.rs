use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Reasons a pipeline cannot be saved as a custom filter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Filter name is required")]
    MissingLabel,

    #[error("Cannot save an empty pipeline")]
    EmptyPipeline,

    #[error("Step '{step_id}' must have a field, operator, and value")]
    IncompleteStep { step_id: String },
}
