//! Ordered steps joined by boolean connectors.

pub mod edit;
pub mod validate;

use crate::step::Step;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Boolean connector joining two adjacent steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    /// Expression symbol, e.g. `$and`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Connector::And => "$and",
            Connector::Or => "$or",
        }
    }

    /// Parses a connector leniently; anything unrecognised reads as `AND`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "AND" => Connector::And,
            "OR" => Connector::Or,
            other => {
                warn!("Malformed connector '{}', defaulting to AND", other);
                Connector::And
            }
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connector::And => write!(f, "AND"),
            Connector::Or => write!(f, "OR"),
        }
    }
}

impl<'de> Deserialize<'de> for Connector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => Connector::parse_lenient(&s),
            other => {
                warn!("Malformed connector {:?}, defaulting to AND", other);
                Connector::And
            }
        })
    }
}

/// Number of connectors a pipeline with `steps` steps must hold.
pub fn expected_connectors(steps: usize) -> usize {
    steps.saturating_sub(1)
}

/// Immutable pipeline value. Editing operations return a new pipeline.
///
/// Invariant: `connectors.len() == max(steps.len() - 1, 0)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawPipeline")]
pub struct Pipeline {
    steps: Vec<Step>,
    #[serde(rename = "operators")]
    connectors: Vec<Connector>,
}

#[derive(Deserialize)]
struct RawPipeline {
    #[serde(default)]
    steps: Vec<Step>,
    #[serde(default, alias = "connectors")]
    operators: Vec<Connector>,
}

impl From<RawPipeline> for Pipeline {
    fn from(raw: RawPipeline) -> Self {
        Pipeline::from_parts(raw.steps, raw.operators)
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pipeline, padding with `AND` or truncating the connectors so
    /// the count matches the steps.
    pub fn from_parts(steps: Vec<Step>, connectors: Vec<Connector>) -> Self {
        let mut pipeline = Self { steps, connectors };
        pipeline.normalize_connectors();
        pipeline
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn normalize_connectors(&mut self) {
        let expected = expected_connectors(self.steps.len());
        if self.connectors.len() < expected {
            self.connectors.resize(expected, Connector::And);
        } else {
            self.connectors.truncate(expected);
        }
    }
}
