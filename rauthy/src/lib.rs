//! Terraform provider for Rauthy
//!
//! Manages OIDC clients and their secrets, upstream auth providers, roles,
//! groups and the password policy of a Rauthy instance through its admin API.

pub mod api;
pub mod data_sources;
pub mod logging;
pub mod provider_data;
pub mod resources;
pub mod values;

pub use provider_data::RauthyProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tfplug::context::Context;
use tfplug::data_source::DataSourceWithConfigure;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};
use tfplug::validator::NumberRangeValidator;

const DEFAULT_TIMEOUT_SECS: i64 = 30;

/// Stateless; configure hands the API client to components as provider data
#[derive(Default)]
pub struct RauthyProvider;

impl RauthyProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Provider settings after applying environment fallbacks
struct ProviderSettings {
    endpoint: String,
    api_key: String,
    insecure: bool,
    timeout: Duration,
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl ProviderSettings {
    fn from_config(config: &DynamicValue) -> Result<Self, Vec<Diagnostic>> {
        let mut diagnostics = vec![];

        let endpoint = values::optional_string(config, "endpoint")
            .map_err(|d| diagnostics.push(d))
            .ok()
            .flatten()
            .or_else(|| env_string("RAUTHY_ENDPOINT"));

        let api_key = values::optional_string(config, "api_key")
            .map_err(|d| diagnostics.push(d))
            .ok()
            .flatten()
            .or_else(|| env_string("RAUTHY_API_KEY"));

        let insecure = values::optional_bool(config, "insecure")
            .map_err(|d| diagnostics.push(d))
            .ok()
            .flatten()
            .or_else(|| env_string("RAUTHY_INSECURE").and_then(|v| v.parse::<bool>().ok()))
            .unwrap_or(false);

        let timeout = values::i64_or(config, "timeout", DEFAULT_TIMEOUT_SECS)
            .map_err(|d| diagnostics.push(d))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout < 1 {
            diagnostics.push(Diagnostic::error(
                "Invalid timeout",
                format!("timeout must be at least 1 second, got {}", timeout),
            ));
        }

        if endpoint.is_none() {
            diagnostics.push(Diagnostic::error(
                "Missing endpoint",
                "Endpoint is required. Set it in the provider configuration or via the RAUTHY_ENDPOINT environment variable.",
            ));
        }

        if api_key.is_none() {
            diagnostics.push(Diagnostic::error(
                "Missing API key",
                "API key is required. Set it in the provider configuration or via the RAUTHY_API_KEY environment variable.",
            ));
        }

        match (endpoint, api_key) {
            (Some(endpoint), Some(api_key)) if diagnostics.is_empty() => Ok(Self {
                endpoint,
                api_key,
                insecure,
                timeout: Duration::from_secs(timeout as u64),
            }),
            _ => Err(diagnostics),
        }
    }
}

#[async_trait]
impl Provider for RauthyProvider {
    fn type_name(&self) -> &str {
        "rauthy"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: "rauthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Interact with the Rauthy admin API")
            .attribute(
                AttributeBuilder::new("endpoint", AttributeType::String)
                    .description("Rauthy base URL. May also be set via RAUTHY_ENDPOINT.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("api_key", AttributeType::String)
                    .description("Rauthy API key. May also be set via RAUTHY_API_KEY.")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("insecure", AttributeType::Bool)
                    .description("Skip TLS certificate verification. May also be set via RAUTHY_INSECURE.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("timeout", AttributeType::Number)
                    .description("Request timeout in seconds. Defaults to 30.")
                    .optional()
                    .validator(NumberRangeValidator::at_least(1.0))
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        logging::init();

        let settings = match ProviderSettings::from_config(&request.config) {
            Ok(settings) => settings,
            Err(diagnostics) => {
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        };

        let client = api::Client::with_config(
            &settings.endpoint,
            Box::new(api::ApiKeyAuthenticator::new(settings.api_key)),
            settings.insecure,
            api::ClientConfig {
                timeout: settings.timeout,
                ..Default::default()
            },
        );

        match client {
            Ok(client) => {
                tracing::info!(
                    endpoint = %settings.endpoint,
                    insecure = settings.insecure,
                    terraform_version = %request.terraform_version,
                    "configured Rauthy provider"
                );
                ConfigureProviderResponse {
                    diagnostics: vec![],
                    provider_data: Some(Arc::new(RauthyProviderData::new(client))),
                }
            }
            Err(e) => ConfigureProviderResponse {
                diagnostics: vec![Diagnostic::error(
                    "Unable to create Rauthy client",
                    format!(
                        "An unexpected error occurred when creating the Rauthy API client: {}",
                        e
                    ),
                )],
                provider_data: None,
            },
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources: HashMap<String, ResourceFactory> = HashMap::new();

        resources.insert(
            "rauthy_client".to_string(),
            Box::new(|| {
                Box::new(resources::ClientResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        resources.insert(
            "rauthy_client_secret".to_string(),
            Box::new(|| {
                Box::new(resources::ClientSecretResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        resources.insert(
            "rauthy_auth_provider".to_string(),
            Box::new(|| {
                Box::new(resources::AuthProviderResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        resources.insert(
            "rauthy_role".to_string(),
            Box::new(|| Box::new(resources::RoleResource::new()) as Box<dyn ResourceWithConfigure>),
        );
        resources.insert(
            "rauthy_group".to_string(),
            Box::new(|| {
                Box::new(resources::GroupResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        resources.insert(
            "rauthy_password_policy".to_string(),
            Box::new(|| {
                Box::new(resources::PasswordPolicyResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );

        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources: HashMap<String, DataSourceFactory> = HashMap::new();

        data_sources.insert(
            "rauthy_client".to_string(),
            Box::new(|| {
                Box::new(data_sources::ClientDataSource::new()) as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources.insert(
            "rauthy_auth_provider".to_string(),
            Box::new(|| {
                Box::new(data_sources::AuthProviderDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources.insert(
            "rauthy_role".to_string(),
            Box::new(|| {
                Box::new(data_sources::RoleDataSource::new()) as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources.insert(
            "rauthy_group".to_string(),
            Box::new(|| {
                Box::new(data_sources::GroupDataSource::new()) as Box<dyn DataSourceWithConfigure>
            }),
        );

        data_sources
    }
}
