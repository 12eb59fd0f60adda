use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// A constant typed into a step by the user.
///
/// Values coming out of the editor are frequently numeric strings (`"0.5"`);
/// they stay strings here and are coerced by the compiler only where the
/// operator family expects a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<Literal>),
}

impl Literal {
    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text(value.into())
    }

    /// Integer literal.
    pub fn int(value: i64) -> Self {
        Literal::Number(Number::from(value))
    }

    /// Float literal; non-finite values have no JSON form and become text.
    pub fn float(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Literal::Number(n),
            None => Literal::Text(value.to_string()),
        }
    }

    /// Whether the user actually typed something.
    pub fn is_blank(&self) -> bool {
        match self {
            Literal::Text(s) => s.trim().is_empty(),
            Literal::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Number(n) => serde_json::Value::Number(n.clone()),
            Literal::Text(s) => serde_json::Value::String(s.clone()),
            Literal::List(items) => {
                serde_json::Value::Array(items.iter().map(Literal::to_json).collect())
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Text(s) => write!(f, "\"{s}\""),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::int(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_untagged_roundtrip_shapes() {
        let lit: Literal = serde_json::from_str(r#"["a", 2, true]"#).unwrap();
        assert_eq!(
            lit,
            Literal::List(vec![Literal::text("a"), Literal::int(2), Literal::Bool(true)])
        );

        let lit: Literal = serde_json::from_str(r#""0.5""#).unwrap();
        assert_eq!(lit, Literal::text("0.5"));
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(format!("{}", Literal::text("x")), "\"x\"");
        assert_eq!(format!("{}", Literal::float(2.5)), "2.5");
        assert_eq!(
            format!("{}", Literal::List(vec![Literal::int(1), Literal::int(2)])),
            "[1, 2]"
        );
    }

    #[test]
    fn test_blank_literals() {
        assert!(Literal::text("  ").is_blank());
        assert!(Literal::List(vec![]).is_blank());
        assert!(!Literal::int(0).is_blank());
    }
}
