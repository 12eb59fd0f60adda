use connectors::StoreError;
use model::{FilterId, Literal};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("Literal {0} is not a number")]
    NotNumeric(Literal),

    #[error("Literal {0} is not an integer")]
    NotInteger(Literal),
}

#[derive(Debug, Error)]
pub enum CompileError {
    /// The referenced saved filter could not be loaded.
    #[error("Failed to fetch custom filter {id}: {source}")]
    Fetch {
        id: FilterId,
        #[source]
        source: StoreError,
    },

    /// A saved filter references itself, directly or through others.
    #[error("Cyclic custom filter reference: {}", format_chain(.chain))]
    CyclicReference { chain: Vec<FilterId> },

    #[error("Invalid operand: {0}")]
    Coercion(#[from] CoercionError),

    #[error("Unsupported step: {0}")]
    Unsupported(String),
}

fn format_chain(chain: &[FilterId]) -> String {
    chain
        .iter()
        .map(FilterId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
