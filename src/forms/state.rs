//! Form state store.
//!
//! Holds a nested JSON-shaped record plus the template it was created from.
//! Writes go through [`FormState::set`], which touches exactly one slot and
//! clears the validation error recorded for that path.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use super::path::{FieldPath, Segment};
use super::rules::ValidationResult;
use crate::errors::{Result, TravelBookError};

/// Nested form record with per-path error tracking
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: Value,
    defaults: Value,
    errors: BTreeMap<FieldPath, String>,
    submitting: bool,
}

impl FormState {
    /// Create a store whose defaults are the initial values
    pub fn new(initial: Value) -> Self {
        Self {
            defaults: initial.clone(),
            values: initial,
            errors: BTreeMap::new(),
            submitting: false,
        }
    }

    /// Create a store from any serializable form model
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self> {
        Ok(Self::new(serde_json::to_value(model)?))
    }

    /// Deserialize the current values back into a form model
    pub fn to_model<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.values.clone()).map_err(|source| {
            TravelBookError::Serialization {
                source,
                context: "Form state does not match the form model".to_string(),
            }
        })
    }

    /// The whole current record
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Current value at `path`, falling back to the template's value
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        resolve(&self.values, path).or_else(|| resolve(&self.defaults, path))
    }

    /// Current value at `path` as untrimmed text, if scalar
    pub fn get_text(&self, path: &FieldPath) -> Option<String> {
        self.get(path).and_then(scalar_text)
    }

    /// Replace the value at `path`.
    ///
    /// Missing record keys along the way are created. Indexing past the end
    /// of an array or descending into a scalar is an error.
    pub fn set(&mut self, path: &FieldPath, value: impl Into<Value>) -> Result<()> {
        let slot = resolve_mut(&mut self.values, path)?;
        *slot = value.into();
        trace!(path = %path, "form field updated");
        self.errors.remove(path);
        Ok(())
    }

    /// Mutable access to the array at `path`
    pub fn array_mut(&mut self, path: &FieldPath) -> Result<&mut Vec<Value>> {
        let slot = resolve_mut(&mut self.values, path)?;
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
        slot.as_array_mut().ok_or_else(|| TravelBookError::field_path(path, "not an array"))
    }

    /// Length of the array at `path`, zero when absent
    pub fn array_len(&self, path: &FieldPath) -> usize {
        self.get(path).and_then(Value::as_array).map_or(0, Vec::len)
    }

    /// Restore the template values and drop every recorded error
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.errors.clear();
        self.submitting = false;
    }

    /// Record the errors of a validation pass, replacing earlier ones
    pub fn apply_validation(&mut self, result: &ValidationResult) {
        self.errors = result.errors.clone();
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, String> {
        &self.errors
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn clear_error(&mut self, path: &FieldPath) {
        self.errors.remove(path);
    }

    /// Drop errors recorded for `path` and everything beneath it
    pub fn clear_errors_under(&mut self, path: &FieldPath) {
        self.errors.retain(|key, _| !key.starts_with(path));
    }

    /// Mark the form as submitting. Returns false if a submit is already
    /// in flight; the caller should drop the duplicate.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Re-enable submission after the request settled
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

/// Follow `path` through `root` without modifying anything
pub fn resolve<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments().iter().try_fold(root, |node, segment| match segment {
        Segment::Key(key) => node.as_object()?.get(key),
        Segment::Index(index) => node.as_array()?.get(*index),
    })
}

/// Path prefix made of the first `depth + 1` segments of `path`
fn prefix(path: &FieldPath, depth: usize) -> FieldPath {
    path.segments()[..=depth].iter().fold(FieldPath::root(), |prefix, segment| match segment {
        Segment::Key(key) => prefix.field(key.clone()),
        Segment::Index(index) => prefix.index(*index),
    })
}

/// Check that `path` can be written in `root` without creating anything.
///
/// Absent or null slots reached by a key become records on write, so only
/// key segments may follow them.
fn check_writable(root: &Value, path: &FieldPath) -> Result<()> {
    let mut node = Some(root);
    for (depth, segment) in path.segments().iter().enumerate() {
        node = match (node, segment) {
            (None | Some(Value::Null), Segment::Key(_)) => None,
            (Some(Value::Object(map)), Segment::Key(key)) => map.get(key),
            (Some(_), Segment::Key(_)) => {
                return Err(TravelBookError::field_path(prefix(path, depth), "parent is not a record"))
            }
            (Some(Value::Array(items)), Segment::Index(index)) => {
                let found = items.get(*index);
                if found.is_none() {
                    return Err(TravelBookError::field_path(
                        prefix(path, depth),
                        format!("index {} out of bounds (length {})", index, items.len()),
                    ));
                }
                found
            }
            (_, Segment::Index(_)) => {
                return Err(TravelBookError::field_path(prefix(path, depth), "parent is not an array"))
            }
        };
    }
    Ok(())
}

fn resolve_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Result<&'a mut Value> {
    check_writable(root, path)?;

    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = match segment {
            Segment::Key(key) => {
                if node.is_null() {
                    *node = Value::Object(Map::new());
                }
                match node {
                    Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
                    _ => {
                        return Err(TravelBookError::field_path(
                            prefix(path, depth),
                            "parent is not a record",
                        ))
                    }
                }
            }
            Segment::Index(index) => match node {
                Value::Array(items) => items.get_mut(*index).ok_or_else(|| {
                    TravelBookError::field_path(prefix(path, depth), "index out of bounds")
                })?,
                _ => {
                    return Err(TravelBookError::field_path(
                        prefix(path, depth),
                        "parent is not an array",
                    ))
                }
            },
        };
    }
    Ok(node)
}

/// Text form of a scalar value; `None` for null, records and arrays
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking_state() -> FormState {
        FormState::new(json!({
            "travelDate": "",
            "numberOfPeople": 1,
            "contactInfo": {
                "phone": "",
                "email": "",
                "emergencyContact": { "name": "", "phone": "", "relationship": "" }
            },
            "travelerDetails": [ { "name": "", "age": "" } ]
        }))
    }

    #[test]
    fn test_set_then_get_nested_path() {
        let mut state = booking_state();
        let path: FieldPath = "contactInfo.emergencyContact.phone".parse().unwrap();

        state.set(&path, "+1 555 000 1111").unwrap();

        assert_eq!(state.get(&path), Some(&json!("+1 555 000 1111")));
        assert_eq!(
            state.get(&"contactInfo.emergencyContact.name".parse().unwrap()),
            Some(&json!(""))
        );
        assert_eq!(state.get(&"contactInfo.phone".parse().unwrap()), Some(&json!("")));
    }

    #[test]
    fn test_set_leaves_siblings_untouched() {
        let mut state = booking_state();
        let before = state.values().clone();

        state.set(&"travelerDetails.0.name".parse().unwrap(), "Ada").unwrap();

        let mut expected = before;
        expected["travelerDetails"][0]["name"] = json!("Ada");
        assert_eq!(state.values(), &expected);
    }

    #[test]
    fn test_get_falls_back_to_template() {
        let mut state = booking_state();
        state.array_mut(&FieldPath::key("travelerDetails")).unwrap().clear();

        let name = "travelerDetails.0.name".parse().unwrap();
        assert_eq!(state.get(&name), Some(&json!("")));
        assert_eq!(state.get(&"missing.field".parse().unwrap()), None);
    }

    #[test]
    fn test_set_clears_error_for_path_only() {
        let mut state = booking_state();
        let email: FieldPath = "contactInfo.email".parse().unwrap();
        let phone: FieldPath = "contactInfo.phone".parse().unwrap();

        let mut result = ValidationResult::default();
        result.insert(email.clone(), "email is required");
        result.insert(phone.clone(), "phone is required");
        state.apply_validation(&result);

        state.set(&email, "a@b.co").unwrap();

        assert_eq!(state.error(&email), None);
        assert_eq!(state.error(&phone), Some("phone is required"));
    }

    #[test]
    fn test_set_creates_missing_record_keys() {
        let mut state = FormState::new(json!({}));
        state.set(&"address.city".parse().unwrap(), "Lisbon").unwrap();
        assert_eq!(state.values(), &json!({ "address": { "city": "Lisbon" } }));
    }

    #[test]
    fn test_set_out_of_bounds_index_is_error() {
        let mut state = booking_state();
        let err = state.set(&"travelerDetails.3.name".parse().unwrap(), "x").unwrap_err();
        match err {
            TravelBookError::FieldPath { path, .. } => assert_eq!(path, "travelerDetails.3"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failed_set_leaves_values_unchanged() {
        let mut state = FormState::new(json!({ "a": 1 }));

        let result = state.set(&"x.y.3.z".parse().unwrap(), "v");
        assert!(matches!(result, Err(TravelBookError::FieldPath { ref path, .. }) if path == "x.y.3"));
        assert_eq!(state.values(), &json!({ "a": 1 }));

        let mut state = booking_state();
        let before = state.values().clone();
        assert!(state.set(&"contactInfo.extra.0".parse().unwrap(), "v").is_err());
        assert!(state.array_mut(&"contactInfo.notes.list.2".parse().unwrap()).is_err());
        assert_eq!(state.values(), &before);
    }

    #[test]
    fn test_set_through_scalar_is_error() {
        let mut state = booking_state();
        let result = state.set(&"travelDate.day".parse().unwrap(), 3);
        assert!(matches!(result, Err(TravelBookError::FieldPath { .. })));
    }

    #[test]
    fn test_submit_flag_blocks_duplicates() {
        let mut state = booking_state();
        assert!(state.begin_submit());
        assert!(!state.begin_submit());
        state.finish_submit();
        assert!(state.begin_submit());
    }

    #[test]
    fn test_reset_restores_template() {
        let mut state = booking_state();
        state.set(&FieldPath::key("travelDate"), "2030-01-01").unwrap();
        state.reset();
        assert_eq!(state.get_text(&FieldPath::key("travelDate")), Some(String::new()));
    }
}
