use super::{
    RangeBounds, Step, StepKind,
    value::{StepValue, ValueSource},
};
use crate::{catalog::operator::OperatorCode, core::literal::Literal};
use serde::Deserialize;

/// Partial update of a step coming from the editor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepPatch {
    pub label: Option<String>,
    pub field_name: Option<String>,
    pub operator: Option<OperatorCode>,
    pub value: Option<Literal>,
    /// Drops the current value and returns to literal mode.
    pub clear_value: bool,
    pub value_source: Option<ValueSource>,
    pub use_abs: Option<bool>,
    pub bounds: Option<RangeBounds>,
}

impl StepPatch {
    pub fn operator(code: OperatorCode) -> Self {
        Self {
            operator: Some(code),
            ..Default::default()
        }
    }

    pub fn value(value: impl Into<Literal>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn value_source(source: ValueSource) -> Self {
        Self {
            value_source: Some(source),
            ..Default::default()
        }
    }

    pub fn clear_value() -> Self {
        Self {
            clear_value: true,
            ..Default::default()
        }
    }

    pub fn use_abs(enabled: bool) -> Self {
        Self {
            use_abs: Some(enabled),
            ..Default::default()
        }
    }
}

impl Step {
    /// Returns a copy of the step with `patch` merged in.
    ///
    /// Setting an operator on a step that had none puts it back in literal
    /// mode; a value source puts it in reference mode. A saved filter used as
    /// a value source turns the step into a custom filter reference.
    pub fn patched(&self, patch: StepPatch) -> Step {
        let mut step = self.clone();

        if let Some(label) = patch.label {
            step.label = label;
        }
        if let Some(field_name) = patch.field_name {
            step.field_name = field_name;
        }

        if let Some(code) = patch.operator {
            if step.operator.is_none() && matches!(step.value, StepValue::Field(_)) {
                step.value = StepValue::Empty;
            }
            step.operator = Some(code);
            if let StepKind::CustomFilterRef {
                parent_operator, ..
            } = &mut step.kind
            {
                *parent_operator = Some(code);
            }
        }

        if let Some(value) = patch.value {
            if let StepKind::CustomFilterRef { parent_value, .. } = &mut step.kind {
                *parent_value = Some(value.clone());
            }
            step.value = StepValue::Literal(value);
        }

        if patch.clear_value {
            step.value = StepValue::Empty;
        }

        match patch.value_source {
            Some(ValueSource::Field { field, .. }) => {
                step.value = StepValue::Field(field);
            }
            Some(ValueSource::CustomFilter {
                id,
                label,
                is_boolean,
            }) => {
                // A boolean filter cannot be compared against a number, so it
                // only survives as a plain sub-condition.
                let (parent_operator, parent_value) = if is_boolean {
                    (None, None)
                } else {
                    (step.operator, step.value.as_literal().cloned())
                };
                step.kind = StepKind::CustomFilterRef {
                    filter_id: id,
                    parent_operator,
                    parent_value,
                    is_boolean,
                };
                step.label = label;
                step.value = StepValue::Empty;
            }
            None => {}
        }

        if let StepKind::Range {
            use_abs, bounds, ..
        } = &mut step.kind
        {
            if let Some(enabled) = patch.use_abs {
                *use_abs = enabled;
            }
            if let Some(new_bounds) = patch.bounds {
                *bounds = Some(new_bounds);
            }
        }

        step
    }
}
