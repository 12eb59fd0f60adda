use crate::core::literal::Literal;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::fmt;

/// Compiled expression tree handed to the query executor.
///
/// Serialises in the aggregation vocabulary: operator nodes become
/// single-key maps (`{"$gt": ["$rb", 0.5]}`) and field paths become
/// `$`-prefixed strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Reference to a document field, without the `$` prefix.
    Field(String),
    Literal(Literal),
    Call { symbol: String, args: Args },
}

/// Operands of an operator node.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// `{"$abs": "$x"}`
    Single(Box<Expression>),
    /// `{"$gt": [a, b]}`
    List(Vec<Expression>),
    /// `{"$regexMatch": {"input": a, "regex": b}}`
    Named(Vec<(String, Expression)>),
}

impl Expression {
    pub fn field(path: impl Into<String>) -> Self {
        Expression::Field(path.into())
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal(value.into())
    }

    /// Operator applied to a list of operands.
    pub fn call(symbol: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call {
            symbol: symbol.into(),
            args: Args::List(args),
        }
    }

    /// Operator applied to a single bare operand.
    pub fn unary(symbol: impl Into<String>, arg: Expression) -> Self {
        Expression::Call {
            symbol: symbol.into(),
            args: Args::Single(Box::new(arg)),
        }
    }

    pub fn named(symbol: impl Into<String>, args: Vec<(&str, Expression)>) -> Self {
        Expression::Call {
            symbol: symbol.into(),
            args: Args::Named(
                args.into_iter()
                    .map(|(name, expr)| (name.to_string(), expr))
                    .collect(),
            ),
        }
    }

    /// Operator symbol at the root, if this is an operator node.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Expression::Call { symbol, .. } => Some(symbol),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Expression::Field(path) => serde_json::Value::String(format!("${path}")),
            Expression::Literal(lit) => lit.to_json(),
            Expression::Call { symbol, args } => {
                let value = match args {
                    Args::Single(arg) => arg.to_json(),
                    Args::List(items) => {
                        serde_json::Value::Array(items.iter().map(Expression::to_json).collect())
                    }
                    Args::Named(pairs) => serde_json::Value::Object(
                        pairs
                            .iter()
                            .map(|(name, expr)| (name.clone(), expr.to_json()))
                            .collect(),
                    ),
                };
                let mut map = serde_json::Map::with_capacity(1);
                map.insert(symbol.clone(), value);
                serde_json::Value::Object(map)
            }
        }
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expression::Field(path) => serializer.serialize_str(&format!("${path}")),
            Expression::Literal(lit) => lit.serialize(serializer),
            Expression::Call { symbol, args } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(symbol, args)?;
                map.end()
            }
        }
    }
}

impl Serialize for Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Args::Single(arg) => arg.serialize(serializer),
            Args::List(items) => items.serialize(serializer),
            Args::Named(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (name, expr) in pairs {
                    map.serialize_entry(name, expr)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
