//! Data model of the visual filter builder: the operator catalog, pipeline
//! steps and connectors, saved custom filters and compiled expressions.

pub mod catalog;
pub mod core;
pub mod error;
pub mod expr;
pub mod filter;
pub mod pipeline;
pub mod query;
pub mod step;

pub use catalog::operator::{Operator, OperatorCode, OperatorFamily, RightOperand};
pub use crate::core::{
    identifiers::{FilterId, StepId},
    literal::Literal,
};
pub use error::{CatalogError, ValidationError};
pub use expr::{Args, Expression};
pub use filter::{CustomFilter, NewCustomFilter};
pub use pipeline::{Connector, Pipeline};
pub use query::{QueryDocument, Stage};
pub use step::{
    RangeBounds, Step, StepKind,
    patch::StepPatch,
    value::{StepValue, ValueMode, ValueSource},
};
