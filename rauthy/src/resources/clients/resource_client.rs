//! OIDC client resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceSchemaRequest, ResourceSchemaResponse,
    ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::StringOneOfValidator;

use crate::api::OidcClient;
use crate::provider_data::{client_error, not_configured};
use crate::values::{self, ValueResult};
use crate::RauthyProviderData;

pub(crate) const TOKEN_ALGORITHMS: &[&str] = &["RS256", "RS384", "RS512", "EdDSA"];

#[derive(Default)]
pub struct ClientResource {
    provider_data: Option<RauthyProviderData>,
}

impl ClientResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_data(&self) -> Result<&RauthyProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(not_configured)
    }
}

/// Builds the API model from planned state
pub(crate) fn client_from_plan(plan: &DynamicValue) -> ValueResult<OidcClient> {
    Ok(OidcClient {
        id: values::required_string(plan, "id")?,
        name: values::required_string(plan, "name")?,
        enabled: values::bool_or(plan, "enabled", true)?,
        confidential: values::bool_or(plan, "confidential", false)?,
        redirect_uris: values::string_list(plan, "redirect_uris")?,
        post_logout_redirect_uris: Some(values::string_list(plan, "post_logout_redirect_uris")?),
        flows_enabled: values::string_list(plan, "flows_enabled")?,
        access_token_alg: values::optional_string(plan, "access_token_alg")?
            .unwrap_or_else(|| "EdDSA".to_string()),
        id_token_alg: values::optional_string(plan, "id_token_alg")?
            .unwrap_or_else(|| "EdDSA".to_string()),
        auth_code_lifetime: values::i64_or(plan, "auth_code_lifetime", 60)?,
        access_token_lifetime: values::i64_or(plan, "access_token_lifetime", 1800)?,
        scopes: values::string_list(plan, "scopes")?,
        default_scopes: values::string_list(plan, "default_scopes")?,
        challenges: values::string_list(plan, "challenges")?,
        force_mfa: values::bool_or(plan, "force_mfa", false)?,
        client_uri: values::optional_string(plan, "client_uri")?,
        contacts: values::optional_string_list(plan, "contacts")?,
    })
}

/// Writes every client attribute to `state`
///
/// An empty `client_uri` becomes null. Missing `contacts` become an empty list.
pub(crate) fn write_client_state(state: &mut DynamicValue, client: &OidcClient) -> ValueResult<()> {
    values::set_string(state, "id", &client.id)?;
    values::set_string(state, "name", &client.name)?;
    values::set_bool(state, "enabled", client.enabled)?;
    values::set_bool(state, "confidential", client.confidential)?;
    values::set_string_list(state, "redirect_uris", &client.redirect_uris)?;
    values::set_string_list(
        state,
        "post_logout_redirect_uris",
        client.post_logout_redirect_uris.as_deref().unwrap_or_default(),
    )?;
    values::set_string_list(state, "flows_enabled", &client.flows_enabled)?;
    values::set_string(state, "access_token_alg", &client.access_token_alg)?;
    values::set_string(state, "id_token_alg", &client.id_token_alg)?;
    values::set_i64(state, "auth_code_lifetime", client.auth_code_lifetime)?;
    values::set_i64(state, "access_token_lifetime", client.access_token_lifetime)?;
    values::set_string_list(state, "scopes", &client.scopes)?;
    values::set_string_list(state, "default_scopes", &client.default_scopes)?;
    values::set_string_list(state, "challenges", &client.challenges)?;
    values::set_bool(state, "force_mfa", client.force_mfa)?;
    values::set_optional_string(state, "client_uri", client.client_uri.as_deref())?;
    values::set_string_list(
        state,
        "contacts",
        client.contacts.as_deref().unwrap_or_default(),
    )
}

fn client_state(client: &OidcClient) -> ValueResult<DynamicValue> {
    let mut state = DynamicValue::object();
    write_client_state(&mut state, client)?;
    Ok(state)
}

#[async_trait]
impl Resource for ClientResource {
    fn type_name(&self) -> &str {
        "rauthy_client"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages an OIDC client in Rauthy")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Client identifier")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Client display name")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("enabled", AttributeType::Bool)
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(true))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("confidential", AttributeType::Bool)
                    .description("Whether the client authenticates with a secret")
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("redirect_uris", AttributeType::List(Box::new(AttributeType::String)))
                    .optional()
                    .computed()
                    .default(StaticDefault::string_list(&[]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "post_logout_redirect_uris",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .optional()
                .computed()
                .default(StaticDefault::string_list(&[]))
                .build(),
            )
            .attribute(
                AttributeBuilder::new("flows_enabled", AttributeType::List(Box::new(AttributeType::String)))
                    .description("Enabled OAuth flows")
                    .optional()
                    .computed()
                    .default(StaticDefault::string_list(&["authorization_code"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("access_token_alg", AttributeType::String)
                    .description("Signing algorithm for access tokens")
                    .optional()
                    .computed()
                    .validator(StringOneOfValidator::create(TOKEN_ALGORITHMS))
                    .default(StaticDefault::string("EdDSA"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("id_token_alg", AttributeType::String)
                    .description("Signing algorithm for ID tokens")
                    .optional()
                    .computed()
                    .validator(StringOneOfValidator::create(TOKEN_ALGORITHMS))
                    .default(StaticDefault::string("EdDSA"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("auth_code_lifetime", AttributeType::Number)
                    .description("Authorization code lifetime in seconds")
                    .optional()
                    .computed()
                    .default(StaticDefault::number(60.0))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("access_token_lifetime", AttributeType::Number)
                    .description("Access token lifetime in seconds")
                    .optional()
                    .computed()
                    .default(StaticDefault::number(1800.0))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("scopes", AttributeType::List(Box::new(AttributeType::String)))
                    .optional()
                    .computed()
                    .default(StaticDefault::string_list(&["openid"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("challenges", AttributeType::List(Box::new(AttributeType::String)))
                    .description("Allowed PKCE challenge methods")
                    .optional()
                    .computed()
                    .default(StaticDefault::string_list(&["S256"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("force_mfa", AttributeType::Bool)
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("default_scopes", AttributeType::List(Box::new(AttributeType::String)))
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_uri", AttributeType::String)
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("contacts", AttributeType::List(Box::new(AttributeType::String)))
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_client(&ctx, &request.planned_state).await {
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

        let id = match values::required_string(&request.current_state, "id") {
            Ok(id) => id,
            Err(diag) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                }
            }
        };

        match provider_data.client.clients().get(&ctx, &id).await {
            Ok(client) => {
                let mut new_state = request.current_state.clone();
                match write_client_state(&mut new_state, &client) {
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
                tracing::warn!(id = %id, "client no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics: vec![],
                }
            }
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![client_error("read client", &e)],
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_client(&ctx, &request.planned_state).await {
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

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let result = async {
            let provider_data = self.provider_data()?;
            let id = values::required_string(&request.prior_state, "id")?;
            provider_data
                .client
                .clients()
                .delete(&ctx, &id)
                .await
                .map_err(|e| client_error("delete client", &e))?;
            tracing::info!(id = %id, "deleted client");
            Ok::<(), Diagnostic>(())
        }
        .await;

        DeleteResourceResponse {
            diagnostics: result.err().into_iter().collect(),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
        response
    }
}

impl ClientResource {
    async fn create_client(&self, ctx: &Context, plan: &DynamicValue) -> ValueResult<DynamicValue> {
        let provider_data = self.provider_data()?;
        let model = client_from_plan(plan)?;
        let api = provider_data.client.clients();

        let created = api
            .create(ctx, &model.to_create_payload())
            .await
            .map_err(|e| client_error("create client", &e))?;

        // the create endpoint only takes the basics, the rest is applied by update
        let client = api
            .update(ctx, &created.id, &model)
            .await
            .map_err(|e| client_error("update client", &e))?;

        tracing::info!(id = %client.id, "created client");
        client_state(&client)
    }

    async fn update_client(&self, ctx: &Context, plan: &DynamicValue) -> ValueResult<DynamicValue> {
        let provider_data = self.provider_data()?;
        let model = client_from_plan(plan)?;

        let client = provider_data
            .client
            .clients()
            .update(ctx, &model.id, &model)
            .await
            .map_err(|e| client_error("update client", &e))?;

        client_state(&client)
    }
}

#[async_trait]
impl ResourceWithConfigure for ClientResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        super::super::configure_resource(&mut self.provider_data, request)
    }
}
