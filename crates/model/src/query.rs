use crate::expr::Expression;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// One aggregation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// `{"$match": {"$expr": <expression>}}`
    Match(Expression),
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stage::Match(expr) => {
                let mut stage = serializer.serialize_map(Some(1))?;
                stage.serialize_entry("$match", &ExprWrapper(expr))?;
                stage.end()
            }
        }
    }
}

struct ExprWrapper<'a>(&'a Expression);

impl Serialize for ExprWrapper<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$expr", self.0)?;
        map.end()
    }
}

/// Aggregation pipeline handed to the query executor. Serialises as a plain
/// array of stages; an empty document means "no filter".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct QueryDocument {
    stages: Vec<Stage>,
}

impl QueryDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn matching(expr: Expression) -> Self {
        Self {
            stages: vec![Stage::Match(expr)],
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Expression of the match stage, if any.
    pub fn match_expression(&self) -> Option<&Expression> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Match(expr) => Some(expr),
        })
    }
}

impl From<Option<Expression>> for QueryDocument {
    fn from(expr: Option<Expression>) -> Self {
        expr.map(QueryDocument::matching).unwrap_or_default()
    }
}
