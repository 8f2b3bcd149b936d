//! Declarative field rules and validation results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::path::FieldPath;

/// Constraints for a single field. Unset constraints are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub phone: bool,
    /// Name used in messages instead of the path's last key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ValidationRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn min(mut self, value: impl Into<f64>) -> Self {
        self.min = Some(value.into());
        self
    }

    pub fn max(mut self, value: impl Into<f64>) -> Self {
        self.max = Some(value.into());
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn phone(mut self) -> Self {
        self.phone = true;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Ordered mapping of field path to rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: BTreeMap<FieldPath, ValidationRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for `path`
    pub fn rule(mut self, path: FieldPath, rule: ValidationRule) -> Self {
        self.rules.insert(path, rule);
        self
    }

    pub fn insert(&mut self, path: FieldPath, rule: ValidationRule) {
        self.rules.insert(path, rule);
    }

    pub fn get(&self, path: &FieldPath) -> Option<&ValidationRule> {
        self.rules.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &ValidationRule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Outcome of validating a form: one message per failing field
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub errors: BTreeMap<FieldPath, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error, replacing any earlier message for the same field
    pub fn insert(&mut self, path: FieldPath, message: impl Into<String>) {
        self.errors.insert(path, message.into());
    }

    pub fn get(&self, path: &FieldPath) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// Look up an error by its dotted path
    pub fn message_for(&self, dotted: &str) -> Option<&str> {
        dotted.parse::<FieldPath>().ok().and_then(|path| self.errors.get(&path)).map(String::as_str)
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// `Ok(())` when valid, otherwise the result itself
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("isValid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

impl Serialize for RuleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.rules.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_constraints() {
        let rule = ValidationRule::new().required().min_length(2).max_length(50);
        assert!(rule.required);
        assert_eq!(rule.min_length, Some(2));
        assert_eq!(rule.max_length, Some(50));
        assert!(!rule.email);
    }

    #[test]
    fn test_rule_deserializes_from_camel_case() {
        let rule: ValidationRule =
            serde_json::from_str(r#"{"required":true,"minLength":3,"phone":true}"#).unwrap();
        assert_eq!(rule, ValidationRule::new().required().min_length(3).phone());
    }

    #[test]
    fn test_result_serializes_with_is_valid_shape() {
        let mut result = ValidationResult::default();
        result.insert("travelerDetails.1.name".parse().unwrap(), "name is required");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"]["travelerDetails.1.name"], "name is required");
        assert!(!result.is_valid());
        assert_eq!(result.message_for("travelerDetails.1.name"), Some("name is required"));
    }

    #[test]
    fn test_merge_and_into_result() {
        let mut first = ValidationResult::default();
        let mut second = ValidationResult::default();
        second.insert(FieldPath::key("images"), "At least one image is required");
        first.merge(second);

        assert!(first.clone().into_result().is_err());
        assert!(ValidationResult::default().into_result().is_ok());
    }
}
