//! Rule evaluation over a [`FormState`] snapshot.
//!
//! Per field the checks run in a fixed order (required, minLength,
//! maxLength, email, phone, min, max) and the first failure is the field's
//! message. Empty, non-required fields are skipped.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::path::FieldPath;
use super::rules::{RuleSet, ValidationResult, ValidationRule};
use super::state::{resolve, scalar_text, FormState};

lazy_static! {
    /// Single `@`, no whitespace, a dot somewhere after the `@`
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("EMAIL_REGEX should be a valid regex pattern");

    /// Digits, spaces, dashes, parentheses, optional leading `+`
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[\d\s\-()]+$")
        .expect("PHONE_REGEX should be a valid regex pattern");
}

const MIN_PHONE_DIGITS: usize = 10;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
        && phone.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

/// Validate every rule in `rules` against the current values of `state`
pub fn validate(state: &FormState, rules: &RuleSet) -> ValidationResult {
    validate_value(state.values(), rules)
}

/// Validate a raw JSON record
pub fn validate_value(record: &Value, rules: &RuleSet) -> ValidationResult {
    let mut result = ValidationResult::default();
    for (path, rule) in rules.iter() {
        if let Some(message) = check_field(path, resolve(record, path), rule) {
            result.insert(path.clone(), message);
        }
    }
    result
}

/// Evaluate one rule; `None` when the value passes
pub fn check_field(path: &FieldPath, value: Option<&Value>, rule: &ValidationRule) -> Option<String> {
    let label = rule
        .label
        .clone()
        .or_else(|| path.leaf_name().map(str::to_string))
        .unwrap_or_else(|| path.to_string());

    if is_blank(value) {
        return rule.required.then(|| format!("{} is required", label));
    }

    let text = value.and_then(scalar_text).unwrap_or_default();
    let length = text.chars().count();

    if let Some(min_length) = rule.min_length {
        if length < min_length {
            return Some(format!("{} must be at least {} characters", label, min_length));
        }
    }

    if let Some(max_length) = rule.max_length {
        if length > max_length {
            return Some(format!("{} cannot exceed {} characters", label, max_length));
        }
    }

    if rule.email && !is_valid_email(&text) {
        return Some("Please enter a valid email address".to_string());
    }

    if rule.phone && !is_valid_phone(&text) {
        return Some("Please enter a valid phone number".to_string());
    }

    // Non-numeric text is left to the type-specific checks of each form.
    let number = value.and_then(as_number);

    if let (Some(min), Some(number)) = (rule.min, number) {
        if number < min {
            return Some(format!("{} must be at least {}", label, format_bound(min)));
        }
    }

    if let (Some(max), Some(number)) = (rule.max, number) {
        if number > max {
            return Some(format!("{} cannot exceed {}", label, format_bound(max)));
        }
    }

    None
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}
