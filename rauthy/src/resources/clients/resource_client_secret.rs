//! Client secret resource implementation
//!
//! Rauthy has no standalone secret object: a client has exactly one secret
//! which can be rotated or read back. Creating this resource rotates the
//! secret, and destroying it only forgets the value.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::plan_modifier::RequiresReplace;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource,
    ReadResourceRequest, ReadResourceResponse, Resource, ResourceSchemaRequest,
    ResourceSchemaResponse, ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::NumberRangeValidator;

use crate::api::{ClientSecret, ClientSecretRequest};
use crate::provider_data::{client_error, not_configured};
use crate::values::{self, ValueResult};
use crate::RauthyProviderData;

#[derive(Default)]
pub struct ClientSecretResource {
    provider_data: Option<RauthyProviderData>,
}

impl ClientSecretResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_data(&self) -> Result<&RauthyProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(not_configured)
    }
}

fn cache_hours(plan: &DynamicValue) -> ValueResult<u32> {
    let hours = values::i64_or(plan, "cache_current_hours", 0)?;
    u32::try_from(hours).map_err(|_| {
        Diagnostic::error(
            "Invalid attribute value",
            format!("cache_current_hours must be between 0 and 24, got {}", hours),
        )
        .with_attribute(AttributePath::new("cache_current_hours"))
    })
}

fn write_secret(state: &mut DynamicValue, secret: &ClientSecret) -> ValueResult<()> {
    values::set_optional_string(state, "secret", secret.secret.as_deref())
}

/// Splits `<client_id>/<secret_id>`
fn parse_import_id(id: &str) -> Option<(&str, &str)> {
    match id.split_once('/') {
        Some((client_id, secret_id))
            if !client_id.is_empty() && !secret_id.is_empty() && !secret_id.contains('/') =>
        {
            Some((client_id, secret_id))
        }
        _ => None,
    }
}

#[async_trait]
impl Resource for ClientSecretResource {
    fn type_name(&self) -> &str {
        "rauthy_client_secret"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages the secret of a confidential Rauthy client")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Secret identifier")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_id", AttributeType::String)
                    .description("Client the secret belongs to")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("cache_current_hours", AttributeType::Number)
                    .description("Hours the previous secret stays valid after rotation")
                    .optional()
                    .computed()
                    .validator(NumberRangeValidator::between(0.0, 24.0))
                    .default(StaticDefault::number(0.0))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("secret", AttributeType::String)
                    .description("The client secret")
                    .computed()
                    .sensitive()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = async {
            let provider_data = self.provider_data()?;
            let plan = &request.planned_state;
            let client_id = values::required_string(plan, "client_id")?;
            let secret_request = ClientSecretRequest {
                cache_current_hours: cache_hours(plan)?,
            };

            let secret = provider_data
                .client
                .client_secrets()
                .rotate(&ctx, &client_id, &secret_request)
                .await
                .map_err(|e| client_error("create client secret", &e))?;

            let mut state = plan.clone();
            write_secret(&mut state, &secret)?;
            tracing::info!(client_id = %client_id, "rotated client secret");
            Ok::<DynamicValue, Diagnostic>(state)
        }
        .await;

        match result {
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
        let provider_data = match self.provider_data() {
            Ok(data) => data,
            Err(diag) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                }
            }
        };

        let client_id = match values::required_string(&request.current_state, "client_id") {
            Ok(id) => id,
            Err(diag) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                }
            }
        };

        match provider_data.client.client_secrets().get(&ctx, &client_id).await {
            Ok(secret) => {
                let mut new_state = request.current_state.clone();
                match write_secret(&mut new_state, &secret) {
                    Ok(()) => ReadResourceResponse {
                        new_state: Some(new_state),
                        diagnostics: vec![],
                    },
                    Err(diag) => ReadResourceResponse {
                        new_state: Some(request.current_state),
                        diagnostics: vec![diag],
                    },
                }
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(client_id = %client_id, "client no longer exists, removing secret from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics: vec![],
                }
            }
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![client_error("read client secret", &e)],
            },
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        // only cache_current_hours changes in place and it only matters on rotation
        let mut new_state = request.planned_state;
        let secret = request
            .prior_state
            .get(&AttributePath::new("secret"))
            .cloned();
        let diagnostics = match secret {
            Some(secret) => values::set(&mut new_state, "secret", secret).err().into_iter().collect(),
            None => vec![],
        };

        UpdateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let client_id = values::optional_string(&request.prior_state, "client_id")
            .ok()
            .flatten()
            .unwrap_or_default();
        tracing::info!(
            client_id = %client_id,
            "client secrets cannot be deleted, removing from state only"
        );

        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let result = async {
            let (client_id, secret_id) = parse_import_id(&request.id).ok_or_else(|| {
                Diagnostic::error(
                    "Invalid import ID",
                    "ID format is invalid, expected <client_id>/<secret_id>",
                )
            })?;

            let provider_data = self.provider_data()?;
            provider_data
                .client
                .clients()
                .get(&ctx, client_id)
                .await
                .map_err(|e| client_error("read client", &e))?;

            let mut state = DynamicValue::object();
            values::set_string(&mut state, "id", secret_id)?;
            values::set_string(&mut state, "client_id", client_id)?;
            values::set_i64(&mut state, "cache_current_hours", 0)?;
            Ok::<DynamicValue, Diagnostic>(state)
        }
        .await;

        match result {
            Ok(state) => ImportResourceStateResponse {
                imported_resources: vec![ImportedResource {
                    type_name: request.type_name,
                    state,
                }],
                diagnostics: vec![],
            },
            Err(diag) => ImportResourceStateResponse {
                imported_resources: vec![],
                diagnostics: vec![diag],
            },
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for ClientSecretResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        super::super::configure_resource(&mut self.provider_data, request)
    }
}
