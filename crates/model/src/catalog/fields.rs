use crate::error::CatalogError;
use serde::Serialize;

/// A filterable document field offered by the editor palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// The field is signed and may be compared by absolute value.
    pub has_abs: bool,
}

static FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor {
        id: "rb",
        label: "Real/Bogus Score",
        description: "ML score indicating if the detected object is real (1) or an artifact (0)",
        field: "rb",
        min: 0.0,
        max: 1.0,
        step: 0.1,
        has_abs: false,
    },
    FieldDescriptor {
        id: "drb",
        label: "Deep Learning R/B Score",
        description: "Deep learning model score for real (1) vs artifact (0) classification",
        field: "drb",
        min: 0.0,
        max: 1.0,
        step: 0.1,
        has_abs: false,
    },
    FieldDescriptor {
        id: "galactic_latitude",
        label: "Galactic Latitude",
        description: "Angular distance from the galactic plane in degrees",
        field: "galactic_latitude",
        min: -90.0,
        max: 90.0,
        step: 1.0,
        has_abs: true,
    },
    FieldDescriptor {
        id: "jd",
        label: "Julian Date",
        description: "Julian Date of the detection",
        field: "jd",
        min: 2450000.0,
        max: 2459000.0,
        step: 1.0,
        has_abs: false,
    },
    FieldDescriptor {
        id: "jdstarthist",
        label: "Start Julian Date",
        description: "Start Julian Date of the detection history",
        field: "jdstarthist",
        min: 2450000.0,
        max: 2459000.0,
        step: 1.0,
        has_abs: false,
    },
];

pub fn fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    FIELDS.iter()
}

pub fn lookup_field(id: &str) -> Result<&'static FieldDescriptor, CatalogError> {
    FIELDS
        .iter()
        .find(|f| f.id == id)
        .ok_or_else(|| CatalogError::UnknownField(id.to_string()))
}

/// Case-insensitive search over labels and descriptions; an empty query
/// matches everything.
pub fn search_fields(query: &str) -> Vec<&'static FieldDescriptor> {
    let needle = query.trim().to_lowercase();
    FIELDS
        .iter()
        .filter(|f| {
            needle.is_empty()
                || f.label.to_lowercase().contains(&needle)
                || f.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_field() {
        let field = lookup_field("galactic_latitude").unwrap();
        assert!(field.has_abs);
        assert_eq!(field.min, -90.0);
        assert!(lookup_field("ra").is_err());
    }

    #[test]
    fn test_search_fields() {
        let ids: Vec<_> = search_fields("julian").iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["jd", "jdstarthist"]);
        assert_eq!(search_fields("").len(), 5);

        let ids: Vec<_> = search_fields("artifact").iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["rb", "drb"]);
    }
}
