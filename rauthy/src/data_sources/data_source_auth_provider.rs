//! Upstream auth provider data source implementation

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
use crate::resources::providers::resource_auth_provider::{
    write_provider_state, CLAIM_ATTRIBUTES, ENDPOINT_ATTRIBUTES, FLAG_ATTRIBUTES,
};
use crate::values;
use crate::RauthyProviderData;

#[derive(Default)]
pub struct AuthProviderDataSource {
    provider_data: Option<RauthyProviderData>,
}

impl AuthProviderDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for AuthProviderDataSource {
    fn type_name(&self) -> &str {
        "rauthy_auth_provider"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let mut builder = SchemaBuilder::new()
            .version(0)
            .description("Looks up an upstream identity provider by id")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_secret", AttributeType::String)
                    .computed()
                    .sensitive()
                    .build(),
            );

        let identity = ["name", "typ", "issuer", "client_id"];
        let strings = identity.into_iter().chain(
            ENDPOINT_ATTRIBUTES
                .iter()
                .chain(CLAIM_ATTRIBUTES)
                .map(|attr| attr.name),
        );
        for name in strings {
            builder = builder.attribute(AttributeBuilder::new(name, AttributeType::String).computed().build());
        }
        for attr in FLAG_ATTRIBUTES {
            builder = builder.attribute(AttributeBuilder::new(attr.name, AttributeType::Bool).computed().build());
        }

        DataSourceSchemaResponse {
            schema: builder.build(),
            diagnostics: vec![],
        }
    }

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = async {
            let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
            let id = values::required_string(&request.config, "id")?;
            let provider = provider_data
                .client
                .auth_providers()
                .get(&ctx, &id)
                .await
                .map_err(|e| client_error("read auth provider", &e))?;

            let mut state = DynamicValue::object();
            write_provider_state(&mut state, &provider)?;
            values::set_optional_string(&mut state, "client_secret", provider.client_secret.as_deref())?;
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
impl DataSourceWithConfigure for AuthProviderDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        super::configure_data_source(&mut self.provider_data, request)
    }
}
