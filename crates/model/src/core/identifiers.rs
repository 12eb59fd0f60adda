use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, sync::Arc};

/// Identifier of a step, unique within its pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(Arc<str>);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    /// Fresh id derived from a palette entry, e.g. `rb-5f0c…`.
    pub fn generate(prefix: &str) -> Self {
        Self::new(format!("{prefix}-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a saved custom filter.
///
/// The filter store hands ids out in its native object-id form
/// (`{"$oid": "..."}`); both that and a bare string are accepted on input.
/// Output is always the bare string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FilterId(Arc<str>);

impl FilterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FilterId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for FilterId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilterId {
    Plain(String),
    Object {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl<'de> Deserialize<'de> for FilterId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = match RawFilterId::deserialize(deserializer)? {
            RawFilterId::Plain(id) => id,
            RawFilterId::Object { oid } => oid,
        };
        Ok(Self::new(id))
    }
}
