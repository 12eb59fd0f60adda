//! Pipeline steps: one user-authored condition each.

pub mod patch;
mod record;
pub mod value;

use crate::{
    catalog::{
        fields::FieldDescriptor,
        operator::{Operator, OperatorCode},
    },
    core::{
        identifiers::{FilterId, StepId},
        literal::Literal,
    },
};
use serde::{Deserialize, Serialize};
use value::{StepValue, ValueMode};

/// Lower and upper bound of a `between` range step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeBounds {
    #[serde(default)]
    pub min: Option<Literal>,
    #[serde(default)]
    pub max: Option<Literal>,
}

impl RangeBounds {
    pub fn new(min: impl Into<Literal>, max: impl Into<Literal>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Both bounds were typed in.
    pub fn is_complete(&self) -> bool {
        let typed = |bound: &Option<Literal>| bound.as_ref().is_some_and(|l| !l.is_blank());
        typed(&self.min) && typed(&self.max)
    }
}

/// Kind-specific part of a step. Each kind carries exactly the fields it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StepKind {
    Range {
        #[serde(default)]
        has_abs: bool,
        #[serde(default)]
        use_abs: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounds: Option<RangeBounds>,
    },
    Array {
        /// Pre-transform applied to the field, e.g. `size`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },
    Element,
    Evaluation,
    Computed {
        /// Field paths combined by the math operation; empty means the step's own field.
        #[serde(default)]
        operands: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operation: Option<OperatorCode>,
    },
    CustomFilterRef {
        #[serde(alias = "fieldReference")]
        filter_id: FilterId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_operator: Option<OperatorCode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_value: Option<Literal>,
        #[serde(default)]
        is_boolean: bool,
    },
    #[serde(other)]
    Generic,
}

impl StepKind {
    pub fn range() -> Self {
        StepKind::Range {
            has_abs: false,
            use_abs: false,
            bounds: None,
        }
    }

    /// Kinds whose literals are numeric wherever the operator allows it.
    pub fn expects_number(&self) -> bool {
        matches!(self, StepKind::Range { .. } | StepKind::Computed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Range { .. } => "range",
            StepKind::Array { .. } => "array",
            StepKind::Element => "element",
            StepKind::Evaluation => "evaluation",
            StepKind::Computed { .. } => "computed",
            StepKind::CustomFilterRef { .. } => "customFilterRef",
            StepKind::Generic => "generic",
        }
    }
}

/// One condition of a pipeline. On the wire the value is flat: `value`
/// plus an `isValueField` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "record::RawStep", into = "record::StepRecord")]
pub struct Step {
    pub id: StepId,
    pub label: String,
    /// Document path being tested.
    pub field_name: String,
    /// `None` marks the step as incomplete.
    pub operator: Option<OperatorCode>,
    pub value: StepValue,
    pub kind: StepKind,
}

impl Step {
    pub fn new(id: impl Into<StepId>, field_name: impl Into<String>, kind: StepKind) -> Self {
        let field_name = field_name.into();
        Self {
            id: id.into(),
            label: field_name.clone(),
            field_name,
            operator: None,
            value: StepValue::Empty,
            kind,
        }
    }

    pub fn range(id: impl Into<StepId>, field_name: impl Into<String>) -> Self {
        Self::new(id, field_name, StepKind::range())
    }

    /// New incomplete range step for a palette field.
    pub fn from_field(descriptor: &FieldDescriptor) -> Self {
        let mut step = Self::new(
            StepId::generate(descriptor.id),
            descriptor.field,
            StepKind::Range {
                has_abs: descriptor.has_abs,
                use_abs: false,
                bounds: None,
            },
        );
        step.label = descriptor.label.to_string();
        step
    }

    /// Step that embeds a saved filter as a boolean sub-condition.
    pub fn custom_filter(
        id: impl Into<StepId>,
        filter_id: impl Into<FilterId>,
        label: impl Into<String>,
        is_boolean: bool,
    ) -> Self {
        let mut step = Self::new(
            id,
            String::new(),
            StepKind::CustomFilterRef {
                filter_id: filter_id.into(),
                parent_operator: None,
                parent_value: None,
                is_boolean,
            },
        );
        step.label = label.into();
        step
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_operator(mut self, code: OperatorCode) -> Self {
        self.operator = Some(code);
        self
    }

    pub fn with_literal(mut self, value: impl Into<Literal>) -> Self {
        self.value = StepValue::Literal(value.into());
        self
    }

    /// Compares against another document field instead of a literal.
    pub fn with_field_value(mut self, path: impl Into<String>) -> Self {
        self.value = StepValue::Field(path.into());
        self
    }

    pub fn operator(&self) -> Option<&'static Operator> {
        self.operator.map(|code| code.operator())
    }

    pub fn value_mode(&self) -> ValueMode {
        self.value.mode()
    }

    pub fn is_custom_filter_ref(&self) -> bool {
        matches!(self.kind, StepKind::CustomFilterRef { .. })
    }

    /// Whether the step has everything it needs to be saved.
    pub fn is_complete(&self) -> bool {
        if self.is_custom_filter_ref() {
            return true;
        }
        let Some(operator) = self.operator() else {
            return false;
        };
        if self.field_name.trim().is_empty() {
            return false;
        }
        if operator.code == OperatorCode::Between {
            return matches!(
                &self.kind,
                StepKind::Range { bounds: Some(bounds), .. } if bounds.is_complete()
            );
        }
        match &self.kind {
            StepKind::Computed { .. } => true,
            _ => !operator.takes_value() || !self.value.is_missing(),
        }
    }

    /// Whether the step produces a comparison result.
    pub fn yields_boolean(&self) -> bool {
        match &self.kind {
            StepKind::CustomFilterRef {
                parent_operator: Some(op),
                ..
            } => op.operator().is_comparison(),
            StepKind::CustomFilterRef { is_boolean, .. } => *is_boolean,
            _ => {
                self.operator().is_some_and(Operator::is_comparison)
                    && !self.value.is_missing()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fields::lookup_field;

    #[test]
    fn test_step_deserializes_editor_shape() {
        let step: Step = serde_json::from_str(
            r#"{
                "id": "rb-1",
                "label": "Real/Bogus Score",
                "field": "rb",
                "kind": "range",
                "operator": {"id": "gt", "label": ">", "operator": "gt"},
                "value": "0.5"
            }"#,
        )
        .unwrap();

        assert_eq!(step.field_name, "rb");
        assert_eq!(step.operator, Some(OperatorCode::Gt));
        assert_eq!(step.value, StepValue::Literal(Literal::text("0.5")));
        assert_eq!(step.kind, StepKind::range());
    }

    #[test]
    fn test_unknown_kind_falls_back_to_generic() {
        let step: Step =
            serde_json::from_str(r#"{"id": "s", "fieldName": "x", "kind": "geo"}"#).unwrap();
        assert_eq!(step.kind, StepKind::Generic);
        assert_eq!(step.operator, None);
        assert_eq!(step.value, StepValue::Empty);
    }

    #[test]
    fn test_custom_filter_ref_accepts_field_reference_alias() {
        let step: Step = serde_json::from_str(
            r#"{"id": "c", "label": "bright", "kind": "customFilterRef",
                "fieldReference": "f1", "parentOperator": "gt", "parentValue": "3"}"#,
        )
        .unwrap();
        assert_eq!(
            step.kind,
            StepKind::CustomFilterRef {
                filter_id: FilterId::from("f1"),
                parent_operator: Some(OperatorCode::Gt),
                parent_value: Some(Literal::text("3")),
                is_boolean: false,
            }
        );
    }

    #[test]
    fn test_from_field_carries_abs_capability() {
        let step = Step::from_field(lookup_field("galactic_latitude").unwrap());
        assert_eq!(step.label, "Galactic Latitude");
        assert_eq!(step.field_name, "galactic_latitude");
        assert!(matches!(step.kind, StepKind::Range { has_abs: true, use_abs: false, .. }));
        assert!(step.operator.is_none());
    }

    #[test]
    fn test_completeness() {
        let step = Step::range("a", "rb");
        assert!(!step.is_complete());

        let step = step.with_operator(OperatorCode::Gt);
        assert!(!step.is_complete());
        assert!(step.clone().with_literal(0.5).is_complete());
        assert!(step.with_field_value("drb").is_complete());

        let exists = Step::new("e", "y", StepKind::Element).with_operator(OperatorCode::Exists);
        assert!(exists.is_complete());
    }

    #[test]
    fn test_between_needs_both_bounds() {
        let step = Step::range("b", "jd")
            .with_operator(OperatorCode::Between)
            .with_literal(5);
        assert!(!step.is_complete());

        let half = Step::new(
            "b",
            "jd",
            StepKind::Range {
                has_abs: false,
                use_abs: false,
                bounds: Some(RangeBounds {
                    min: Some(Literal::int(1)),
                    max: Some(Literal::text(" ")),
                }),
            },
        )
        .with_operator(OperatorCode::Between);
        assert!(!half.is_complete());

        let full = Step::new(
            "b",
            "jd",
            StepKind::Range {
                has_abs: false,
                use_abs: false,
                bounds: Some(RangeBounds::new(1, 9)),
            },
        )
        .with_operator(OperatorCode::Between);
        assert!(full.is_complete());
    }

    #[test]
    fn test_yields_boolean() {
        let cmp = Step::range("a", "rb")
            .with_operator(OperatorCode::Gt)
            .with_literal(1);
        assert!(cmp.yields_boolean());

        let math = Step::new(
            "m",
            "rb",
            StepKind::Computed {
                operands: vec![],
                operation: None,
            },
        )
        .with_operator(OperatorCode::Add);
        assert!(!math.yields_boolean());
    }
}
