//! Data source implementations

pub mod data_source_auth_provider;
pub mod data_source_client;
pub mod data_source_group;
pub mod data_source_role;

pub use data_source_auth_provider::AuthProviderDataSource;
pub use data_source_client::ClientDataSource;
pub use data_source_group::GroupDataSource;
pub use data_source_role::RoleDataSource;

use crate::RauthyProviderData;
use tfplug::data_source::{ConfigureDataSourceRequest, ConfigureDataSourceResponse};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

pub(crate) fn configure_data_source(
    slot: &mut Option<RauthyProviderData>,
    request: ConfigureDataSourceRequest,
) -> ConfigureDataSourceResponse {
    match RauthyProviderData::from_any(
        request.provider_data,
        "Unexpected Data Source Configure Type",
    ) {
        Ok(data) => {
            *slot = data;
            ConfigureDataSourceResponse {
                diagnostics: vec![],
            }
        }
        Err(diag) => ConfigureDataSourceResponse {
            diagnostics: vec![diag],
        },
    }
}

/// Lookups by `id` or `name` need at least one of the two
///
/// Unknown values pass since they are only resolved at apply time.
pub(crate) fn validate_id_or_name(config: &DynamicValue) -> Vec<Diagnostic> {
    let is_null = |name: &str| {
        config
            .get(&AttributePath::new(name))
            .map_or(true, |value| value.is_null())
    };

    if is_null("id") && is_null("name") {
        vec![Diagnostic::error(
            "Invalid Attribute Combination",
            "Either 'name' or 'id' must be specified.",
        )]
    } else {
        vec![]
    }
}

/// True when `candidate` matches whichever of `id` and `name` is set
pub(crate) fn matches_id_or_name(
    candidate_id: &str,
    candidate_name: &str,
    id: Option<&str>,
    name: Option<&str>,
) -> bool {
    id.is_some_and(|id| id == candidate_id) || name.is_some_and(|name| name == candidate_name)
}
