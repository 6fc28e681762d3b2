//! Group resource implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::UseStateForUnknown;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceSchemaRequest, ResourceSchemaResponse,
    ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use crate::api::{Group, GroupRequest};
use crate::provider_data::{client_error, not_configured};
use crate::values::{self, ValueResult};
use crate::RauthyProviderData;

#[derive(Default)]
pub struct GroupResource {
    provider_data: Option<RauthyProviderData>,
}

impl GroupResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_data(&self) -> Result<&RauthyProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(not_configured)
    }

    async fn create_group(&self, ctx: &Context, plan: &DynamicValue) -> ValueResult<DynamicValue> {
        let provider_data = self.provider_data()?;
        let request = GroupRequest {
            group: values::required_string(plan, "name")?,
        };
        let group = provider_data
            .client
            .groups()
            .create(ctx, &request)
            .await
            .map_err(|e| client_error("create group", &e))?;
        tracing::info!(id = %group.id, name = %group.name, "created group");
        group_state(&group)
    }

    async fn update_group(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> ValueResult<DynamicValue> {
        let provider_data = self.provider_data()?;
        let id = values::required_string(prior, "id")?;
        let request = GroupRequest {
            group: values::required_string(plan, "name")?,
        };
        let group = provider_data
            .client
            .groups()
            .update(ctx, &id, &request)
            .await
            .map_err(|e| client_error("update group", &e))?;
        group_state(&group)
    }
}

fn group_state(group: &Group) -> ValueResult<DynamicValue> {
    let mut state = DynamicValue::object();
    values::set_string(&mut state, "id", &group.id)?;
    values::set_string(&mut state, "name", &group.name)?;
    Ok(state)
}

#[async_trait]
impl Resource for GroupResource {
    fn type_name(&self) -> &str {
        "rauthy_group"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a Rauthy group")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Group identifier")
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Group name")
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
        match self.create_group(&ctx, &request.planned_state).await {
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

        match provider_data.client.groups().get(&ctx, &id).await {
            Ok(group) => match group_state(&group) {
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
                tracing::warn!(id = %id, "group no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics: vec![],
                }
            }
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![client_error("read group", &e)],
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self
            .update_group(&ctx, &request.prior_state, &request.planned_state)
            .await
        {
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
                .groups()
                .delete(&ctx, &id)
                .await
                .map_err(|e| client_error("delete group", &e))?;
            tracing::info!(id = %id, "deleted group");
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
impl ResourceWithConfigure for GroupResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        super::super::configure_resource(&mut self.provider_data, request)
    }
}
