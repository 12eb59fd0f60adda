//! Compiles filter pipelines into aggregation expressions, expanding saved
//! custom filters through a [`connectors::FilterStore`].

pub mod coerce;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod resolver;
mod step;

pub use coerce::{coerce_integer, coerce_number};
pub use error::{CoercionError, CompileError};
pub use pipeline::Compiler;
pub use report::{CompileReport, StepIssue};
pub use resolver::{CustomFilterResolver, Trail};
