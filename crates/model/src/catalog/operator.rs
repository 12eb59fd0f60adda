use crate::error::CatalogError;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Operator families, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorFamily {
    Comparison,
    Array,
    Element,
    Evaluation,
    Math,
}

impl OperatorFamily {
    pub const ALL: [OperatorFamily; 5] = [
        OperatorFamily::Comparison,
        OperatorFamily::Array,
        OperatorFamily::Element,
        OperatorFamily::Evaluation,
        OperatorFamily::Math,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorFamily::Comparison => "comparison",
            OperatorFamily::Array => "array",
            OperatorFamily::Element => "element",
            OperatorFamily::Evaluation => "evaluation",
            OperatorFamily::Math => "math",
        }
    }
}

impl fmt::Display for OperatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of operands an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    /// Only the field itself (`exists`, `type`).
    Unary,
    /// Field and one right-hand operand.
    Binary,
    /// Field and a lower/upper bound pair (`between`).
    Ternary,
    /// Any number of operands (math operators).
    Variadic,
}

/// What the right-hand operand of an operator may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RightOperand {
    /// No right-hand operand.
    None,
    /// A number, or a field path holding one.
    Number,
    /// An integer divisor (`mod`).
    Integer,
    /// A sequence, or a field path holding one.
    List,
    /// Any literal or a field path.
    Any,
}

/// Operator codes understood by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorCode {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    In,
    Nin,
    All,
    Exists,
    Type,
    Mod,
    Regex,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl OperatorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorCode::Eq => "eq",
            OperatorCode::Ne => "ne",
            OperatorCode::Gt => "gt",
            OperatorCode::Gte => "gte",
            OperatorCode::Lt => "lt",
            OperatorCode::Lte => "lte",
            OperatorCode::Between => "between",
            OperatorCode::In => "in",
            OperatorCode::Nin => "nin",
            OperatorCode::All => "all",
            OperatorCode::Exists => "exists",
            OperatorCode::Type => "type",
            OperatorCode::Mod => "mod",
            OperatorCode::Regex => "regex",
            OperatorCode::Add => "add",
            OperatorCode::Subtract => "subtract",
            OperatorCode::Multiply => "multiply",
            OperatorCode::Divide => "divide",
        }
    }

    /// Catalog entry for this code. Every code has one.
    pub fn operator(&self) -> &'static Operator {
        super::entry(*self)
    }

    pub fn family(&self) -> OperatorFamily {
        self.operator().family
    }

    /// Expression symbol, e.g. `$gte`.
    pub fn symbol(&self) -> &'static str {
        self.operator().symbol
    }
}

impl FromStr for OperatorCode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::CATALOG
            .iter()
            .find(|op| op.code.as_str() == s)
            .map(|op| op.code)
            .ok_or_else(|| CatalogError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for OperatorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The editor stores operators either as a bare code (`"gt"`) or as the whole
/// palette block it was dragged from (`{"id": "gt", "label": ">", "operator": "gt", ...}`).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOperator {
    Code(String),
    Block { operator: String },
}

impl<'de> Deserialize<'de> for OperatorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = match RawOperator::deserialize(deserializer)? {
            RawOperator::Code(code) => code,
            RawOperator::Block { operator } => operator,
        };
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Catalog entry describing one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    pub code: OperatorCode,
    pub family: OperatorFamily,
    pub arity: Arity,
    pub symbol: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub right: RightOperand,
}

impl Operator {
    /// True when the operator compares and therefore yields a boolean.
    pub fn is_comparison(&self) -> bool {
        self.family == OperatorFamily::Comparison
    }

    /// Whether this operator needs a value beside the field.
    pub fn takes_value(&self) -> bool {
        !matches!(self.arity, Arity::Unary)
    }
}
