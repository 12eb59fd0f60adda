use super::Pipeline;
use crate::error::ValidationError;

impl Pipeline {
    /// Checks that the pipeline can be saved under `label`: the label is
    /// non-blank and every step other than a saved-filter reference has a
    /// field, an operator and a value.
    pub fn validate_for_save(&self, label: &str) -> Result<(), ValidationError> {
        if label.trim().is_empty() {
            return Err(ValidationError::MissingLabel);
        }
        if self.is_empty() {
            return Err(ValidationError::EmptyPipeline);
        }
        match self.steps.iter().find(|step| !step.is_complete()) {
            Some(step) => Err(ValidationError::IncompleteStep {
                step_id: step.id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Whether the compiled pipeline yields a boolean (at least one step is a
    /// comparison with a value) rather than a scalar or array.
    pub fn is_boolean_result(&self) -> bool {
        self.steps.iter().any(|step| step.yields_boolean())
    }
}
