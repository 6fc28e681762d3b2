//! Schema-driven planning
//!
//! Produces the planned new state for a resource from its prior state and
//! configuration, the way the plugin host expects a provider to:
//!
//! 1. Configured values win. Unset computed attributes carry their prior value.
//! 2. Unset attributes with a default receive it.
//! 3. If anything changed, unset computed attributes without a default become
//!    unknown ("known after apply").
//! 4. Attribute plan modifiers run last and may request replacement.

use crate::plan_modifier::values_equal;
use crate::schema::{DefaultRequest, PlanModifierRequest, Schema};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use std::collections::HashMap;

pub struct PlannedChange {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlannedChange {
    pub fn is_destroy(&self) -> bool {
        self.planned_state.is_null()
    }
}

pub fn plan_resource_change(
    schema: &Schema,
    prior_state: &DynamicValue,
    config: &DynamicValue,
) -> PlannedChange {
    if config.is_null() {
        return PlannedChange {
            planned_state: DynamicValue::null(),
            requires_replace: vec![],
            diagnostics: vec![],
        };
    }

    let attribute_value = |source: &DynamicValue, name: &str| {
        source
            .get(&AttributePath::new(name))
            .cloned()
            .unwrap_or(Dynamic::Null)
    };

    let mut planned: HashMap<String, Dynamic> = HashMap::new();
    for attr in &schema.block.attributes {
        let configured = attribute_value(config, &attr.name);
        let value = if !configured.is_null() {
            configured
        } else if let Some(default) = attr.default.as_ref().filter(|_| attr.optional || attr.computed) {
            default
                .default_value(DefaultRequest {
                    path: AttributePath::new(&attr.name),
                })
                .value
                .value
        } else if attr.computed {
            attribute_value(prior_state, &attr.name)
        } else {
            Dynamic::Null
        };
        planned.insert(attr.name.clone(), value);
    }

    let has_changes = match &prior_state.value {
        Dynamic::Null => true,
        prior => !values_equal(prior, &Dynamic::Map(planned.clone())),
    };

    if has_changes {
        for attr in &schema.block.attributes {
            if attr.computed
                && attr.default.is_none()
                && attribute_value(config, &attr.name).is_null()
            {
                planned.insert(attr.name.clone(), Dynamic::Unknown);
            }
        }
    }

    let mut requires_replace = Vec::new();
    let mut diagnostics = Vec::new();

    for attr in &schema.block.attributes {
        if attr.plan_modifiers.is_empty() {
            continue;
        }

        let path = AttributePath::new(&attr.name);
        let state_value = DynamicValue::new(attribute_value(prior_state, &attr.name));
        let config_value = DynamicValue::new(attribute_value(config, &attr.name));
        let mut plan_value =
            DynamicValue::new(planned.get(&attr.name).cloned().unwrap_or(Dynamic::Null));

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify(PlanModifierRequest {
                config_value: config_value.clone(),
                state_value: state_value.clone(),
                plan_value,
                path: path.clone(),
            });

            plan_value = response.plan_value;
            diagnostics.extend(response.diagnostics);

            if response.requires_replace && !requires_replace.contains(&path) {
                tracing::debug!(attribute = %path, "attribute change requires replacement");
                requires_replace.push(path.clone());
            }
        }

        planned.insert(attr.name.clone(), plan_value.value);
    }

    PlannedChange {
        planned_state: DynamicValue::new(Dynamic::Map(planned)),
        requires_replace,
        diagnostics,
    }
}
