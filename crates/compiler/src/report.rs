use crate::error::CompileError;
use model::{Expression, FilterId, QueryDocument, StepId};
use serde::{Serialize, Serializer};

/// A step that was skipped because it failed to compile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepIssue {
    pub step_id: StepId,
    /// Position of the step within its pipeline.
    pub index: usize,
    /// Saved filter the step belongs to; `None` for the top-level pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterId>,
    #[serde(rename = "message", serialize_with = "error_message")]
    pub error: CompileError,
}

fn error_message<S: Serializer>(error: &CompileError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Compiled expression plus every step that had to be dropped.
#[derive(Debug, Default, Serialize)]
pub struct CompileReport {
    pub expression: Option<Expression>,
    pub issues: Vec<StepIssue>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_query(self) -> QueryDocument {
        QueryDocument::from(self.expression)
    }
}
