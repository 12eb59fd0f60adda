use crate::core::{identifiers::FilterId, literal::Literal};
use serde::{Deserialize, Serialize};

/// Right-hand value of a step.
///
/// A step is either waiting for (or holding) a literal typed by the user, or
/// it references another document field. One enum keeps the two modes
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StepValue {
    /// Literal mode, nothing typed yet.
    #[default]
    Empty,
    /// Literal mode with a constant.
    Literal(Literal),
    /// Reference mode: path of another document field.
    Field(String),
}

/// Which kind of value a step is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    AwaitingLiteral,
    Reference,
}

impl StepValue {
    pub fn mode(&self) -> ValueMode {
        match self {
            StepValue::Empty | StepValue::Literal(_) => ValueMode::AwaitingLiteral,
            StepValue::Field(_) => ValueMode::Reference,
        }
    }

    /// True when nothing usable has been supplied.
    pub fn is_missing(&self) -> bool {
        match self {
            StepValue::Empty => true,
            StepValue::Literal(lit) => lit.is_blank(),
            StepValue::Field(path) => path.trim().is_empty(),
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            StepValue::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

/// Something dropped onto a step's value slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValueSource {
    /// Another document field from the palette.
    Field {
        field: String,
        #[serde(default)]
        label: Option<String>,
    },
    /// A saved custom filter whose result becomes the value.
    CustomFilter {
        #[serde(alias = "_id")]
        id: FilterId,
        label: String,
        #[serde(default)]
        is_boolean: bool,
    },
}
