//! OIDC client data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

use crate::provider_data::{client_error, not_configured};
use crate::resources::clients::resource_client::write_client_state;
use crate::values;
use crate::RauthyProviderData;

fn string_list() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::String))
}

#[derive(Default)]
pub struct ClientDataSource {
    provider_data: Option<RauthyProviderData>,
}

impl ClientDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, ctx: &Context, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
        let id = values::required_string(config, "id")?;

        tracing::debug!(id = %id, "reading client data source");
        let client = provider_data
            .client
            .clients()
            .get(ctx, &id)
            .await
            .map_err(|e| client_error("read client", &e))?;

        let mut state = DynamicValue::object();
        write_client_state(&mut state, &client)?;
        values::set_optional_string_list(&mut state, "contacts", client.contacts.as_deref())?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for ClientDataSource {
    fn type_name(&self) -> &str {
        "rauthy_client"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let computed = [
            ("name", AttributeType::String),
            ("enabled", AttributeType::Bool),
            ("confidential", AttributeType::Bool),
            ("redirect_uris", string_list()),
            ("post_logout_redirect_uris", string_list()),
            ("flows_enabled", string_list()),
            ("access_token_alg", AttributeType::String),
            ("id_token_alg", AttributeType::String),
            ("auth_code_lifetime", AttributeType::Number),
            ("access_token_lifetime", AttributeType::Number),
            ("scopes", string_list()),
            ("default_scopes", string_list()),
            ("challenges", string_list()),
            ("force_mfa", AttributeType::Bool),
            ("client_uri", AttributeType::String),
            ("contacts", string_list()),
        ];

        let builder = SchemaBuilder::new()
            .version(0)
            .description("Looks up an OIDC client by id")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Client identifier")
                    .required()
                    .build(),
            );
        let schema = computed
            .into_iter()
            .fold(builder, |builder, (name, r#type)| {
                builder.attribute(AttributeBuilder::new(name, r#type).computed().build())
            })
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
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
impl DataSourceWithConfigure for ClientDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        super::configure_data_source(&mut self.provider_data, request)
    }
}
