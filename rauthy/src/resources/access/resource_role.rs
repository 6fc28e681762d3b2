//! Role resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::plan_modifier::UseStateForUnknown;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource,
    ReadResourceRequest, ReadResourceResponse, Resource, ResourceSchemaRequest,
    ResourceSchemaResponse, ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

use crate::api::{Role, RoleRequest};
use crate::provider_data::{client_error, not_configured};
use crate::values::{self, ValueResult};
use crate::RauthyProviderData;

#[derive(Default)]
pub struct RoleResource {
    provider_data: Option<RauthyProviderData>,
}

impl RoleResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_data(&self) -> Result<&RauthyProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(not_configured)
    }
}

fn role_state(role: &Role) -> ValueResult<DynamicValue> {
    let mut state = DynamicValue::object();
    values::set_string(&mut state, "id", &role.id)?;
    values::set_string(&mut state, "name", &role.name)?;
    Ok(state)
}

#[async_trait]
impl Resource for RoleResource {
    fn type_name(&self) -> &str {
        "rauthy_role"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a Rauthy role")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Role identifier")
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Role name")
                    .required()
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
            let name = values::required_string(&request.planned_state, "name")?;
            let role = provider_data
                .client
                .roles()
                .create(&ctx, &RoleRequest { role: name })
                .await
                .map_err(|e| client_error("create role", &e))?;
            tracing::info!(id = %role.id, name = %role.name, "created role");
            role_state(&role)
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

        match provider_data.client.roles().get(&ctx, &id).await {
            Ok(role) => match role_state(&role) {
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
                tracing::warn!(id = %id, "role no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics: vec![],
                }
            }
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![client_error("read role", &e)],
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = async {
            let provider_data = self.provider_data()?;
            let id = values::required_string(&request.prior_state, "id")?;
            let name = values::required_string(&request.planned_state, "name")?;
            let role = provider_data
                .client
                .roles()
                .update(&ctx, &id, &RoleRequest { role: name })
                .await
                .map_err(|e| client_error("update role", &e))?;
            role_state(&role)
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
                .roles()
                .delete(&ctx, &id)
                .await
                .map_err(|e| client_error("delete role", &e))?;
            tracing::info!(id = %id, "deleted role");
            Ok::<(), Diagnostic>(())
        }
        .await;

        DeleteResourceResponse {
            diagnostics: result.err().into_iter().collect(),
        }
    }

    /// Looks the role up so the imported state carries its name
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let result = async {
            let provider_data = self.provider_data()?;
            let role = provider_data
                .client
                .roles()
                .get(&ctx, &request.id)
                .await
                .map_err(|e| client_error("import role", &e))?;
            role_state(&role)
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
impl ResourceWithConfigure for RoleResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        super::super::configure_resource(&mut self.provider_data, request)
    }
}
