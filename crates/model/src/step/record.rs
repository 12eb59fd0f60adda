//! Wire shape of a step.
//!
//! Stored filters and pipeline files keep the value flat: `value` holds the
//! literal or the referenced field path and `isValueField` tells the two
//! apart. Older records tag the kind with `type` (`customFilter` for saved
//! filter references) and keep `between` bounds as `minValue`/`maxValue`.

use super::{RangeBounds, Step, StepKind, value::StepValue};
use crate::{
    catalog::operator::OperatorCode,
    core::{identifiers::StepId, literal::Literal},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawStep {
    id: StepId,
    #[serde(default)]
    label: String,
    #[serde(default, alias = "field")]
    field_name: String,
    #[serde(default)]
    operator: Option<OperatorCode>,
    #[serde(default)]
    value: Option<Literal>,
    #[serde(default)]
    is_value_field: bool,
    #[serde(default, alias = "type")]
    kind: Option<String>,
    #[serde(default)]
    min_value: Option<Literal>,
    #[serde(default)]
    max_value: Option<Literal>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StepRecord {
    id: StepId,
    label: String,
    field_name: String,
    operator: Option<OperatorCode>,
    value: Option<Literal>,
    is_value_field: bool,
    #[serde(flatten)]
    kind: StepKind,
}

fn kind_tag(kind: Option<&str>) -> &str {
    match kind.map(str::trim) {
        Some("customFilter") => "customFilterRef",
        Some(tag) if !tag.is_empty() => tag,
        _ => "generic",
    }
}

fn step_value(value: Option<Literal>, is_value_field: bool) -> StepValue {
    match value {
        None => StepValue::Empty,
        Some(lit) if lit.is_blank() => StepValue::Empty,
        Some(Literal::Text(path)) if is_value_field => StepValue::Field(path),
        Some(lit) if is_value_field => StepValue::Field(lit.to_json().to_string()),
        Some(lit) => StepValue::Literal(lit),
    }
}

impl TryFrom<RawStep> for Step {
    type Error = serde_json::Error;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let RawStep {
            id,
            label,
            field_name,
            operator,
            value,
            is_value_field,
            kind,
            min_value,
            max_value,
            mut rest,
        } = raw;

        let tag = kind_tag(kind.as_deref()).to_string();
        if !rest.contains_key("bounds") && (min_value.is_some() || max_value.is_some()) {
            let bounds = RangeBounds {
                min: min_value,
                max: max_value,
            };
            rest.insert("bounds".into(), serde_json::to_value(bounds)?);
        }
        rest.insert("kind".into(), Value::String(tag));
        let kind: StepKind = serde_json::from_value(Value::Object(rest))?;

        Ok(Step {
            id,
            label,
            field_name,
            operator,
            value: step_value(value, is_value_field),
            kind,
        })
    }
}

impl From<Step> for StepRecord {
    fn from(step: Step) -> Self {
        let (value, is_value_field) = match step.value {
            StepValue::Empty => (None, false),
            StepValue::Literal(lit) => (Some(lit), false),
            StepValue::Field(path) => (Some(Literal::Text(path)), true),
        };
        Self {
            id: step.id,
            label: step.label,
            field_name: step.field_name,
            operator: step.operator,
            value,
            is_value_field,
            kind: step.kind,
        }
    }
}
