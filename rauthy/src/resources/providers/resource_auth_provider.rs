//! Upstream auth provider resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::RequiresReplace;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceSchemaRequest, ResourceSchemaResponse,
    ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::StringPatternValidator;

use crate::api::AuthProvider;
use crate::provider_data::{client_error, not_configured};
use crate::values::{self, ValueResult};
use crate::RauthyProviderData;

/// Optional string attribute tied to its `AuthProvider` field
pub(crate) struct TextAttribute {
    pub name: &'static str,
    pub get: fn(&AuthProvider) -> Option<&str>,
    pub set: fn(&mut AuthProvider, Option<String>),
}

/// Boolean attribute with its default, tied to its `AuthProvider` field
pub(crate) struct FlagAttribute {
    pub name: &'static str,
    pub default: bool,
    pub get: fn(&AuthProvider) -> bool,
    pub set: fn(&mut AuthProvider, bool),
}

pub(crate) const ENDPOINT_ATTRIBUTES: &[TextAttribute] = &[
    TextAttribute {
        name: "authorization_endpoint",
        get: |p| p.authorization_endpoint.as_deref(),
        set: |p, v| p.authorization_endpoint = v,
    },
    TextAttribute {
        name: "token_endpoint",
        get: |p| p.token_endpoint.as_deref(),
        set: |p, v| p.token_endpoint = v,
    },
    TextAttribute {
        name: "userinfo_endpoint",
        get: |p| p.userinfo_endpoint.as_deref(),
        set: |p, v| p.userinfo_endpoint = v,
    },
    TextAttribute {
        name: "jwks_endpoint",
        get: |p| p.jwks_endpoint.as_deref(),
        set: |p, v| p.jwks_endpoint = v,
    },
];

pub(crate) const CLAIM_ATTRIBUTES: &[TextAttribute] = &[
    TextAttribute {
        name: "scope",
        get: |p| p.scope.as_deref(),
        set: |p, v| p.scope = v,
    },
    TextAttribute {
        name: "admin_claim_path",
        get: |p| p.admin_claim_path.as_deref(),
        set: |p, v| p.admin_claim_path = v,
    },
    TextAttribute {
        name: "admin_claim_value",
        get: |p| p.admin_claim_value.as_deref(),
        set: |p, v| p.admin_claim_value = v,
    },
    TextAttribute {
        name: "mfa_claim_path",
        get: |p| p.mfa_claim_path.as_deref(),
        set: |p, v| p.mfa_claim_path = v,
    },
    TextAttribute {
        name: "mfa_claim_value",
        get: |p| p.mfa_claim_value.as_deref(),
        set: |p, v| p.mfa_claim_value = v,
    },
];

pub(crate) const FLAG_ATTRIBUTES: &[FlagAttribute] = &[
    FlagAttribute {
        name: "enabled",
        default: true,
        get: |p| p.enabled,
        set: |p, v| p.enabled = v,
    },
    FlagAttribute {
        name: "auto_link",
        default: false,
        get: |p| p.auto_link,
        set: |p, v| p.auto_link = v,
    },
    FlagAttribute {
        name: "auto_onboarding",
        default: false,
        get: |p| p.auto_onboarding,
        set: |p, v| p.auto_onboarding = v,
    },
    FlagAttribute {
        name: "client_secret_basic",
        default: true,
        get: |p| p.client_secret_basic,
        set: |p, v| p.client_secret_basic = v,
    },
    FlagAttribute {
        name: "client_secret_post",
        default: false,
        get: |p| p.client_secret_post,
        set: |p, v| p.client_secret_post = v,
    },
    FlagAttribute {
        name: "use_pkce",
        default: true,
        get: |p| p.use_pkce,
        set: |p, v| p.use_pkce = v,
    },
];

#[derive(Default)]
pub struct AuthProviderResource {
    provider_data: Option<RauthyProviderData>,
}

impl AuthProviderResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_data(&self) -> Result<&RauthyProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(not_configured)
    }
}

pub(crate) fn provider_from_plan(plan: &DynamicValue) -> ValueResult<AuthProvider> {
    let mut provider = AuthProvider {
        id: values::required_string(plan, "id")?,
        name: values::required_string(plan, "name")?,
        typ: values::required_string(plan, "typ")?,
        issuer: values::required_string(plan, "issuer")?,
        client_id: values::required_string(plan, "client_id")?,
        client_secret: values::optional_string(plan, "client_secret")?,
        ..Default::default()
    };

    for attr in ENDPOINT_ATTRIBUTES.iter().chain(CLAIM_ATTRIBUTES) {
        (attr.set)(&mut provider, values::optional_string(plan, attr.name)?);
    }
    for attr in FLAG_ATTRIBUTES {
        (attr.set)(&mut provider, values::bool_or(plan, attr.name, attr.default)?);
    }
    Ok(provider)
}

/// Writes every provider attribute except `client_secret` to `state`
///
/// Empty optional strings become null.
pub(crate) fn write_provider_state(
    state: &mut DynamicValue,
    provider: &AuthProvider,
) -> ValueResult<()> {
    values::set_string(state, "id", &provider.id)?;
    values::set_string(state, "name", &provider.name)?;
    values::set_string(state, "typ", &provider.typ)?;
    values::set_string(state, "issuer", &provider.issuer)?;
    values::set_string(state, "client_id", &provider.client_id)?;

    for attr in ENDPOINT_ATTRIBUTES.iter().chain(CLAIM_ATTRIBUTES) {
        values::set_optional_string(state, attr.name, (attr.get)(provider))?;
    }
    for attr in FLAG_ATTRIBUTES {
        values::set_bool(state, attr.name, (attr.get)(provider))?;
    }
    Ok(())
}

/// State for `provider`, falling back to `prior`'s secret when the API omits it
fn provider_state(provider: &AuthProvider, prior: &DynamicValue) -> ValueResult<DynamicValue> {
    let mut state = prior.clone();
    write_provider_state(&mut state, provider)?;
    if let Some(secret) = provider.client_secret.as_deref().filter(|s| !s.is_empty()) {
        values::set_string(&mut state, "client_secret", secret)?;
    }
    Ok(state)
}

#[async_trait]
impl Resource for AuthProviderResource {
    fn type_name(&self) -> &str {
        "rauthy_auth_provider"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let mut builder = SchemaBuilder::new()
            .version(0)
            .description("Manages an upstream identity provider in Rauthy")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Provider identifier")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("typ", AttributeType::String)
                    .description("Provider type, e.g. oidc, github or google")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("issuer", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_id", AttributeType::String)
                    .description("Client id registered at the upstream provider")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_secret", AttributeType::String)
                    .description("Client secret registered at the upstream provider")
                    .required()
                    .sensitive()
                    .build(),
            );

        for attr in ENDPOINT_ATTRIBUTES {
            builder = builder.attribute(
                AttributeBuilder::new(attr.name, AttributeType::String)
                    .optional()
                    .validator(StringPatternValidator::create(
                        r"^https?://",
                        "must be an http(s) URL",
                    ))
                    .build(),
            );
        }
        for attr in CLAIM_ATTRIBUTES {
            builder = builder.attribute(
                AttributeBuilder::new(attr.name, AttributeType::String)
                    .optional()
                    .build(),
            );
        }
        for attr in FLAG_ATTRIBUTES {
            builder = builder.attribute(
                AttributeBuilder::new(attr.name, AttributeType::Bool)
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(attr.default))
                    .build(),
            );
        }

        ResourceSchemaResponse {
            schema: builder.build(),
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = async {
            let provider_data = self.provider_data()?;
            let model = provider_from_plan(&request.planned_state)?;
            let created = provider_data
                .client
                .auth_providers()
                .create(&ctx, &model)
                .await
                .map_err(|e| client_error("create auth provider", &e))?;
            tracing::info!(id = %created.id, name = %created.name, "created auth provider");
            provider_state(&created, &request.planned_state)
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

        let id = match values::required_string(&request.current_state, "id") {
            Ok(id) => id,
            Err(diag) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                }
            }
        };

        match provider_data.client.auth_providers().get(&ctx, &id).await {
            Ok(provider) => match provider_state(&provider, &request.current_state) {
                Ok(state) => ReadResourceResponse {
                    new_state: Some(state),
                    diagnostics: vec![],
                },
                Err(diag) => ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                },
            },
            Err(e) if e.is_not_found() => {
                tracing::warn!(id = %id, "auth provider no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics: vec![],
                }
            }
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![client_error("read auth provider", &e)],
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = async {
            let provider_data = self.provider_data()?;
            let model = provider_from_plan(&request.planned_state)?;
            let updated = provider_data
                .client
                .auth_providers()
                .update(&ctx, &model.id, &model)
                .await
                .map_err(|e| client_error("update auth provider", &e))?;
            provider_state(&updated, &request.planned_state)
        }
        .await;

        match result {
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
                .auth_providers()
                .delete(&ctx, &id)
                .await
                .map_err(|e| client_error("delete auth provider", &e))?;
            tracing::info!(id = %id, "deleted auth provider");
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

#[async_trait]
impl ResourceWithConfigure for AuthProviderResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        super::super::configure_resource(&mut self.provider_data, request)
    }
}
