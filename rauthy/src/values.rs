//! Conversions between Terraform values and API models
//!
//! The Rauthy API reports unset optional strings as `""` and unset lists as
//! `null` or `[]`. In Terraform state both become null.

use tfplug::error::TfplugError;
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

pub type ValueResult<T> = Result<T, Diagnostic>;

pub fn attribute_error(name: &str, err: TfplugError) -> Diagnostic {
    Diagnostic::error(
        "Invalid attribute value",
        format!("Attribute '{}': {}", name, err),
    )
    .with_attribute(AttributePath::new(name))
}

pub fn required_string(value: &DynamicValue, name: &str) -> ValueResult<String> {
    value
        .get_string(&AttributePath::new(name))
        .map_err(|e| attribute_error(name, e))
}

/// Null, unknown and empty strings all read as `None`
pub fn optional_string(value: &DynamicValue, name: &str) -> ValueResult<Option<String>> {
    value
        .get_optional_string(&AttributePath::new(name))
        .map(|s| s.filter(|s| !s.is_empty()))
        .map_err(|e| attribute_error(name, e))
}

pub fn optional_bool(value: &DynamicValue, name: &str) -> ValueResult<Option<bool>> {
    value
        .get_optional_bool(&AttributePath::new(name))
        .map_err(|e| attribute_error(name, e))
}

pub fn bool_or(value: &DynamicValue, name: &str, default: bool) -> ValueResult<bool> {
    optional_bool(value, name).map(|b| b.unwrap_or(default))
}

pub fn optional_i64(value: &DynamicValue, name: &str) -> ValueResult<Option<i64>> {
    value
        .get_optional_i64(&AttributePath::new(name))
        .map_err(|e| attribute_error(name, e))
}

pub fn i64_or(value: &DynamicValue, name: &str, default: i64) -> ValueResult<i64> {
    optional_i64(value, name).map(|n| n.unwrap_or(default))
}

/// Null and unknown lists read as empty
pub fn string_list(value: &DynamicValue, name: &str) -> ValueResult<Vec<String>> {
    value
        .get_optional_string_list(&AttributePath::new(name))
        .map(Option::unwrap_or_default)
        .map_err(|e| attribute_error(name, e))
}

pub fn optional_string_list(value: &DynamicValue, name: &str) -> ValueResult<Option<Vec<String>>> {
    value
        .get_optional_string_list(&AttributePath::new(name))
        .map_err(|e| attribute_error(name, e))
}

pub fn set(state: &mut DynamicValue, name: &str, value: Dynamic) -> ValueResult<()> {
    state
        .set(&AttributePath::new(name), value)
        .map_err(|e| attribute_error(name, e))
}

pub fn set_string(state: &mut DynamicValue, name: &str, value: &str) -> ValueResult<()> {
    set(state, name, Dynamic::String(value.to_string()))
}

pub fn set_bool(state: &mut DynamicValue, name: &str, value: bool) -> ValueResult<()> {
    set(state, name, Dynamic::Bool(value))
}

pub fn set_i64(state: &mut DynamicValue, name: &str, value: i64) -> ValueResult<()> {
    set(state, name, Dynamic::Number(value as f64))
}

/// Writes `None` and `""` as null
pub fn set_optional_string(
    state: &mut DynamicValue,
    name: &str,
    value: Option<&str>,
) -> ValueResult<()> {
    match value.filter(|s| !s.is_empty()) {
        Some(s) => set_string(state, name, s),
        None => set(state, name, Dynamic::Null),
    }
}

pub fn set_string_list(state: &mut DynamicValue, name: &str, value: &[String]) -> ValueResult<()> {
    set(state, name, Dynamic::string_list(value.iter().cloned()))
}

/// Writes `None` and empty lists as null
pub fn set_optional_string_list(
    state: &mut DynamicValue,
    name: &str,
    value: Option<&[String]>,
) -> ValueResult<()> {
    match value.filter(|l| !l.is_empty()) {
        Some(items) => set_string_list(state, name, items),
        None => set(state, name, Dynamic::Null),
    }
}
