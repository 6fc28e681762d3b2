//! Schema-driven configuration validation
//!
//! Checks a configuration object against a [`Schema`]: required attributes,
//! read-only attributes, value types, unsupported attributes, and the
//! validators attached to each attribute. Unknown values are accepted since
//! they are only resolved at apply time.

use crate::schema::{AttributeType, Schema, ValidatorRequest};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

pub fn validate_config(schema: &Schema, config: &DynamicValue) -> Vec<Diagnostic> {
    let values = match &config.value {
        Dynamic::Map(values) => values,
        Dynamic::Null | Dynamic::Unknown => return vec![],
        other => {
            return vec![Diagnostic::error(
                "Invalid configuration",
                format!("Expected an object, got {}", other.type_name()),
            )]
        }
    };

    let mut diagnostics = Vec::new();

    for attr in &schema.block.attributes {
        let path = AttributePath::new(&attr.name);
        let value = values.get(&attr.name).unwrap_or(&Dynamic::Null);

        if value.is_null() {
            if attr.required {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Missing required attribute: {}", attr.name),
                        format!(
                            "The attribute '{}' is required but was not provided",
                            attr.name
                        ),
                    )
                    .with_attribute(path),
                );
            }
            continue;
        }

        if attr.computed && !attr.optional && !attr.required {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid Configuration for Read-Only Attribute",
                    format!(
                        "Cannot set value for attribute '{}' as it is computed by the provider",
                        attr.name
                    ),
                )
                .with_attribute(path),
            );
            continue;
        }

        if value.is_unknown() {
            continue;
        }

        if !value_matches_type(value, &attr.r#type) {
            diagnostics.push(
                Diagnostic::error(
                    format!("Type mismatch for attribute: {}", attr.name),
                    format!(
                        "Attribute '{}' expects type {:?} but got {}",
                        attr.name,
                        attr.r#type,
                        value.type_name()
                    ),
                )
                .with_attribute(path),
            );
            continue;
        }

        for validator in &attr.validators {
            let response = validator.validate(ValidatorRequest {
                config_value: DynamicValue::new(value.clone()),
                path: path.clone(),
            });
            diagnostics.extend(response.diagnostics);
        }
    }

    let mut unsupported: Vec<&String> = values
        .keys()
        .filter(|name| schema.attribute(name).is_none())
        .collect();
    unsupported.sort();

    for name in unsupported {
        diagnostics.push(
            Diagnostic::error(
                "Unsupported argument",
                format!("An argument named '{}' is not expected here", name),
            )
            .with_attribute(AttributePath::new(name)),
        );
    }

    diagnostics
}

/// Null and unknown match every type
pub fn value_matches_type(value: &Dynamic, expected: &AttributeType) -> bool {
    match (value, expected) {
        (Dynamic::Null, _) | (Dynamic::Unknown, _) => true,
        (Dynamic::String(_), AttributeType::String) => true,
        (Dynamic::Number(_), AttributeType::Number) => true,
        (Dynamic::Bool(_), AttributeType::Bool) => true,
        (Dynamic::List(list), AttributeType::List(elem_type)) => list
            .iter()
            .all(|elem| value_matches_type(elem, elem_type)),
        (Dynamic::Map(map), AttributeType::Map(elem_type)) => map
            .values()
            .all(|elem| value_matches_type(elem, elem_type)),
        _ => false,
    }
}
