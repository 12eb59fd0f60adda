use crate::{
    core::identifiers::FilterId,
    error::ValidationError,
    pipeline::{Connector, Pipeline},
    step::Step,
};
use serde::{Deserialize, Serialize};

/// A saved, named pipeline as returned by the filter store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFilter {
    #[serde(alias = "_id")]
    pub id: FilterId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub operators: Vec<Connector>,
    /// The filter's own expression yields a boolean rather than a scalar.
    #[serde(default)]
    pub is_boolean: bool,
}

impl CustomFilter {
    /// The saved steps as a normalised pipeline.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_parts(self.steps.clone(), self.operators.clone())
    }

    /// Case-insensitive label match; an empty query matches everything.
    pub fn matches_label(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.label.to_lowercase().contains(&needle)
    }
}

/// Payload for saving a pipeline as a custom filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomFilter {
    pub label: String,
    pub description: String,
    pub steps: Vec<Step>,
    pub operators: Vec<Connector>,
    pub is_boolean: bool,
}

impl NewCustomFilter {
    /// Validates `pipeline` and captures it under `label`.
    pub fn from_pipeline(label: &str, pipeline: &Pipeline) -> Result<Self, ValidationError> {
        pipeline.validate_for_save(label)?;
        Ok(Self {
            label: label.trim().to_string(),
            description: format!("Filter with {} conditions", pipeline.len()),
            steps: pipeline.steps().to_vec(),
            operators: pipeline.connectors().to_vec(),
            is_boolean: pipeline.is_boolean_result(),
        })
    }

    /// The record the store will hold once it assigns `id`.
    pub fn into_saved(self, id: FilterId) -> CustomFilter {
        CustomFilter {
            id,
            label: self.label,
            description: Some(self.description),
            steps: self.steps,
            operators: self.operators,
            is_boolean: self.is_boolean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::operator::OperatorCode, step::value::StepValue};

    #[test]
    fn test_custom_filter_from_store_document() {
        let filter: CustomFilter = serde_json::from_str(
            r#"{
                "_id": {"$oid": "65a1"},
                "label": "Real detections",
                "description": "Filter with 1 conditions",
                "steps": [{"id": "rb-1", "field": "rb", "kind": "range",
                           "operator": "gt", "value": 0.5}],
                "operators": [],
                "type": "customFilter",
                "screenshot": "data:image/png;base64,AAAA",
                "isBoolean": true
            }"#,
        )
        .unwrap();

        assert_eq!(filter.id.as_str(), "65a1");
        assert!(filter.is_boolean);
        assert_eq!(filter.pipeline().len(), 1);
        assert!(filter.matches_label("REAL"));
        assert!(!filter.matches_label("bogus"));
    }

    #[test]
    fn test_custom_filter_with_editor_steps() {
        let filter: CustomFilter = serde_json::from_str(
            r#"{
                "_id": {"$oid": "65b2"},
                "label": "Nearby",
                "steps": [
                    {"id": "gl-1", "label": "Galactic Latitude", "type": "range",
                     "field": "galactic_latitude", "min": -90, "max": 90, "step": 1,
                     "hasAbs": true, "useAbs": true,
                     "operator": {"id": "gt", "label": ">", "operator": "gt"},
                     "value": "15", "isValueField": false},
                    {"id": "rb-2", "type": "range", "field": "rb",
                     "operator": "gt", "value": "drb", "isValueField": true},
                    {"id": "jd-3", "type": "range", "field": "jd",
                     "operator": null, "value": null, "isValueField": false}
                ],
                "operators": ["AND", "OR"],
                "isBoolean": true
            }"#,
        )
        .unwrap();

        let steps = filter.pipeline();
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps.steps()[0].value,
            StepValue::Literal(crate::core::literal::Literal::text("15"))
        );
        assert_eq!(steps.steps()[1].value, StepValue::Field("drb".into()));
        assert_eq!(steps.steps()[2].value, StepValue::Empty);
        assert!(!steps.steps()[2].is_complete());
        assert_eq!(steps.connectors(), &[Connector::And, Connector::Or]);
    }

    #[test]
    fn test_new_custom_filter_from_pipeline() {
        let pipeline = Pipeline::new()
            .push_step(
                Step::range("a", "rb")
                    .with_operator(OperatorCode::Gt)
                    .with_literal("0.5"),
            )
            .push_step(
                Step::range("b", "drb")
                    .with_operator(OperatorCode::Lt)
                    .with_literal("0.9"),
            );

        let payload = NewCustomFilter::from_pipeline(" bright ", &pipeline).unwrap();
        assert_eq!(payload.label, "bright");
        assert_eq!(payload.description, "Filter with 2 conditions");
        assert_eq!(payload.operators, vec![Connector::And]);
        assert!(payload.is_boolean);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["isBoolean"], serde_json::json!(true));

        assert!(NewCustomFilter::from_pipeline("", &pipeline).is_err());
    }
}
