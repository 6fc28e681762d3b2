//! Group data source implementation

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
pub struct GroupDataSource {
    provider_data: Option<RauthyProviderData>,
}

impl GroupDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for GroupDataSource {
    fn type_name(&self) -> &str {
        "rauthy_group"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up a Rauthy group by id or name")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
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
        let result = async {
            let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
            let id = values::optional_string(&request.config, "id")?;
            let name = values::optional_string(&request.config, "name")?;

            let groups = provider_data
                .client
                .groups()
                .list(&ctx)
                .await
                .map_err(|e| client_error("list groups", &e))?;
            tracing::debug!(count = groups.len(), "listed groups");

            let group = groups
                .into_iter()
                .find(|g| super::matches_id_or_name(&g.id, &g.name, id.as_deref(), name.as_deref()))
                .ok_or_else(|| {
                    Diagnostic::error("Group Not Found", "No group found with the specified criteria.")
                })?;

            let mut state = DynamicValue::object();
            values::set_string(&mut state, "id", &group.id)?;
            values::set_string(&mut state, "name", &group.name)?;
            Ok::<DynamicValue, Diagnostic>(state)
        }
        .await;

        match result {
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
impl DataSourceWithConfigure for GroupDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        super::configure_data_source(&mut self.provider_data, request)
    }
}
