//! JSON flattening - nested document to single-row table
//!
//! Pure utility, kept separate from JSON parsing because its failure mode is
//! different: a document can be perfectly valid JSON and still not normalize
//! into one tabular row (e.g. a bare scalar, or an array of many objects).
//!
//! Nested object keys are joined with `.`; arrays and scalars become column
//! values as-is. A top-level array is accepted only when it holds exactly one
//! object, which then becomes the row.

use serde_json::{Map, Value};

/// One uploaded document, normalized to a single row of named columns.
///
/// Values stay as raw JSON: type errors in a required column are deliberately
/// not caught here and surface later, at inference time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    columns: Map<String, Value>,
}

impl FeatureRecord {
    /// Column names, in document order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Look up a column value by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Numeric value of a column, if the column exists and is a number.
    pub fn numeric(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(Value::as_f64).map(|v| v as f32)
    }
}

/// Why a valid JSON document could not be turned into a single row.
#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error("top-level JSON must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("top-level array must contain exactly one object, got {0} elements")]
    MultiRowArray(usize),
}

/// Flatten one parsed JSON document into a [`FeatureRecord`].
pub fn flatten(document: &Value) -> Result<FeatureRecord, FlattenError> {
    let object = match document {
        Value::Object(map) => map,
        Value::Array(items) => {
            if items.len() != 1 {
                return Err(FlattenError::MultiRowArray(items.len()));
            }
            match &items[0] {
                Value::Object(map) => map,
                other => return Err(FlattenError::NotAnObject(type_name(other))),
            }
        }
        other => return Err(FlattenError::NotAnObject(type_name(other))),
    };

    let mut columns = Map::new();
    flatten_object(object, None, &mut columns);

    Ok(FeatureRecord { columns })
}

fn flatten_object(object: &Map<String, Value>, prefix: Option<&str>, out: &mut Map<String, Value>) {
    for (key, value) in object {
        let column = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => flatten_object(nested, Some(&column), out),
            leaf => {
                out.insert(column, leaf.clone());
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_object_passes_through() {
        let record = flatten(&json!({"spectrum_bin_1": 0.12, "spectrum_bin_2": 3.4})).unwrap();

        assert_eq!(record.len(), 2);
        assert_eq!(record.numeric("spectrum_bin_1"), Some(0.12));
        assert_eq!(record.numeric("spectrum_bin_2"), Some(3.4));
    }

    #[test]
    fn nested_keys_are_dot_joined() {
        let record = flatten(&json!({
            "isolate": {"species": "K. pneumoniae", "site": {"ward": "ICU"}},
            "spectrum_bin_1": 1.0
        }))
        .unwrap();

        assert_eq!(
            record.get("isolate.species"),
            Some(&json!("K. pneumoniae"))
        );
        assert_eq!(record.get("isolate.site.ward"), Some(&json!("ICU")));
        assert_eq!(record.numeric("spectrum_bin_1"), Some(1.0));
    }

    #[test]
    fn arrays_stay_as_values() {
        let record = flatten(&json!({"raw_peaks": [1, 2, 3]})).unwrap();
        assert_eq!(record.get("raw_peaks"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn single_element_array_becomes_the_row() {
        let record = flatten(&json!([{"spectrum_bin_1": 0.5}])).unwrap();
        assert_eq!(record.numeric("spectrum_bin_1"), Some(0.5));
    }

    #[test]
    fn multi_row_array_is_rejected() {
        let err = flatten(&json!([{"a": 1}, {"a": 2}])).unwrap_err();
        assert!(matches!(err, FlattenError::MultiRowArray(2)));
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(matches!(
            flatten(&json!(42)).unwrap_err(),
            FlattenError::NotAnObject("a number")
        ));
        assert!(matches!(
            flatten(&json!("hello")).unwrap_err(),
            FlattenError::NotAnObject("a string")
        ));
    }

    #[test]
    fn non_numeric_value_is_kept_not_rejected() {
        // Type mismatches are discovered at inference time, not here.
        let record = flatten(&json!({"spectrum_bin_1": "oops"})).unwrap();
        assert_eq!(record.get("spectrum_bin_1"), Some(&json!("oops")));
        assert_eq!(record.numeric("spectrum_bin_1"), None);
    }
}
