//! Role data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};
use tfplug::validation::validate_config;

use crate::provider_data::{client_error, not_configured};
use crate::values;
use crate::RauthyProviderData;

#[derive(Default)]
pub struct RoleDataSource {
    provider_data: Option<RauthyProviderData>,
}

impl RoleDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, ctx: &Context, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
        let id = values::optional_string(config, "id")?;
        let name = values::optional_string(config, "name")?;

        let role = provider_data
            .client
            .roles()
            .list(ctx)
            .await
            .map_err(|e| client_error("list roles", &e))?
            .into_iter()
            .find(|r| super::matches_id_or_name(&r.id, &r.name, id.as_deref(), name.as_deref()))
            .ok_or_else(|| {
                Diagnostic::error("Role Not Found", "No role found with the specified criteria.")
            })?;

        let mut state = DynamicValue::object();
        values::set_string(&mut state, "id", &role.id)?;
        values::set_string(&mut state, "name", &role.name)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for RoleDataSource {
    fn type_name(&self) -> &str {
        "rauthy_role"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up a Rauthy role by id or name")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Role identifier")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Role name")
                    .optional()
                    .computed()
                    .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        let schema = self.schema(ctx, DataSourceSchemaRequest).await.schema;
        let mut diagnostics = validate_config(&schema, &request.config);
        diagnostics.extend(super::validate_id_or_name(&request.config));

        ValidateDataSourceConfigResponse { diagnostics }
    }

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        match self.lookup(&ctx, &request.config).await {
            Ok(state) => ReadDataSourceResponse {
                state,
                diagnostics: vec![],
            },
            Err(diag) => ReadDataSourceResponse {
                state: request.config,
                diagnostics: vec![diag],
            },
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for RoleDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        super::configure_data_source(&mut self.provider_data, request)
    }
}
