//! Password policy resource implementation
//!
//! The password policy is a singleton. Create and update both overwrite it and
//! delete leaves the remote policy untouched.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceSchemaRequest, ResourceSchemaResponse,
    ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validation::validate_config;
use tfplug::validator::NumberRangeValidator;

use crate::api::PasswordPolicy;
use crate::provider_data::{client_error, not_configured};
use crate::values::{self, ValueResult};
use crate::RauthyProviderData;

/// Count attributes and their defaults
const COUNTS: &[(&str, i64)] = &[
    ("include_digits", 1),
    ("include_lower_case", 1),
    ("include_upper_case", 1),
    ("include_special", 0),
    ("not_recently_used", 3),
    ("valid_days", 180),
];

#[derive(Default)]
pub struct PasswordPolicyResource {
    provider_data: Option<RauthyProviderData>,
}

impl PasswordPolicyResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_data(&self) -> Result<&RauthyProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(not_configured)
    }

    async fn apply(&self, ctx: &Context, plan: &DynamicValue) -> ValueResult<DynamicValue> {
        let provider_data = self.provider_data()?;
        let policy = policy_from_plan(plan)?;
        let updated = provider_data
            .client
            .password_policy()
            .update(ctx, &policy)
            .await
            .map_err(|e| client_error("update password policy", &e))?;

        tracing::info!(
            length_min = updated.length_min,
            length_max = updated.length_max,
            "applied password policy"
        );

        let mut state = plan.clone();
        write_policy_state(&mut state, &updated)?;
        Ok(state)
    }
}

fn policy_from_plan(plan: &DynamicValue) -> ValueResult<PasswordPolicy> {
    let count = |name: &str| {
        let default = COUNTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, d)| *d)
            .unwrap_or_default();
        values::i64_or(plan, name, default).map(Some)
    };

    Ok(PasswordPolicy {
        length_min: values::i64_or(plan, "length_min", 0)?,
        length_max: values::i64_or(plan, "length_max", 0)?,
        include_digits: count("include_digits")?,
        include_lower_case: count("include_lower_case")?,
        include_upper_case: count("include_upper_case")?,
        include_special: count("include_special")?,
        not_recently_used: count("not_recently_used")?,
        valid_days: count("valid_days")?,
    })
}

/// Overwrites `state` with the fields the API returned
///
/// Fields missing from the response keep whatever `state` already holds.
fn write_policy_state(state: &mut DynamicValue, policy: &PasswordPolicy) -> ValueResult<()> {
    values::set_i64(state, "length_min", policy.length_min)?;
    values::set_i64(state, "length_max", policy.length_max)?;

    let counts = [
        ("include_digits", policy.include_digits),
        ("include_lower_case", policy.include_lower_case),
        ("include_upper_case", policy.include_upper_case),
        ("include_special", policy.include_special),
        ("not_recently_used", policy.not_recently_used),
        ("valid_days", policy.valid_days),
    ];
    for (name, value) in counts {
        if let Some(value) = value {
            values::set_i64(state, name, value)?;
        }
    }
    Ok(())
}

/// Checks that lengths are ordered when both are known
fn validate_lengths(config: &DynamicValue) -> Option<Diagnostic> {
    let length_min = values::optional_i64(config, "length_min").ok().flatten()?;
    let length_max = values::optional_i64(config, "length_max").ok().flatten()?;

    (length_min > length_max).then(|| {
        Diagnostic::error(
            "Invalid password length",
            format!(
                "length_min ({}) must not be greater than length_max ({})",
                length_min, length_max
            ),
        )
        .with_attribute(AttributePath::new("length_min"))
    })
}

#[async_trait]
impl Resource for PasswordPolicyResource {
    fn type_name(&self) -> &str {
        "rauthy_password_policy"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let mut builder = SchemaBuilder::new()
            .version(0)
            .description("Manages the Rauthy password policy")
            .attribute(
                AttributeBuilder::new("length_min", AttributeType::Number)
                    .description("Minimum password length")
                    .required()
                    .validator(NumberRangeValidator::at_least(0.0))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("length_max", AttributeType::Number)
                    .description("Maximum password length")
                    .required()
                    .validator(NumberRangeValidator::at_least(0.0))
                    .build(),
            );

        for (name, default) in COUNTS {
            builder = builder.attribute(
                AttributeBuilder::new(name, AttributeType::Number)
                    .optional()
                    .computed()
                    .validator(NumberRangeValidator::at_least(0.0))
                    .default(StaticDefault::number(*default as f64))
                    .build(),
            );
        }

        ResourceSchemaResponse {
            schema: builder.build(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let schema = self.schema(ctx, ResourceSchemaRequest).await.schema;
        let mut diagnostics = validate_config(&schema, &request.config);
        diagnostics.extend(validate_lengths(&request.config));

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.apply(&ctx, &request.planned_state).await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => CreateResourceResponse {
                new_state: DynamicValue::null(),
                diagnostics: vec![diag],
            },
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = async {
            let provider_data = self.provider_data()?;
            let policy = provider_data
                .client
                .password_policy()
                .get(&ctx)
                .await
                .map_err(|e| client_error("read password policy", &e))?;

            let mut state = request.current_state.clone();
            write_policy_state(&mut state, &policy)?;
            Ok::<DynamicValue, Diagnostic>(state)
        }
        .await;

        match result {
            Ok(state) => ReadResourceResponse {
                new_state: Some(state),
                diagnostics: vec![],
            },
            Err(diag) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![diag],
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.apply(&ctx, &request.planned_state).await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics: vec![diag],
            },
        }
    }

    async fn delete(&self, _ctx: Context, _request: DeleteResourceRequest) -> DeleteResourceResponse {
        tracing::info!("password policy is a singleton, removing from state only");
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for PasswordPolicyResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        super::super::configure_resource(&mut self.provider_data, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(min: i64, max: i64) -> DynamicValue {
        let mut config = DynamicValue::object();
        config.set_i64(&AttributePath::new("length_min"), min).unwrap();
        config.set_i64(&AttributePath::new("length_max"), max).unwrap();
        config
    }

    #[test]
    fn lengths_must_be_ordered() {
        assert!(validate_lengths(&lengths(8, 128)).is_none());
        assert!(validate_lengths(&lengths(8, 8)).is_none());
        let diag = validate_lengths(&lengths(64, 8)).unwrap();
        assert_eq!(diag.attribute, Some(AttributePath::new("length_min")));
    }

    #[test]
    fn unknown_lengths_are_not_compared() {
        let mut config = lengths(64, 8);
        config
            .set(&AttributePath::new("length_max"), tfplug::types::Dynamic::Unknown)
            .unwrap();
        assert!(validate_lengths(&config).is_none());
    }

    #[test]
    fn plan_fills_count_defaults() {
        let policy = policy_from_plan(&lengths(8, 128)).unwrap();
        assert_eq!(policy.include_digits, Some(1));
        assert_eq!(policy.include_special, Some(0));
        assert_eq!(policy.not_recently_used, Some(3));
        assert_eq!(policy.valid_days, Some(180));
    }
}
