//! Resource implementations

pub mod access;
pub mod clients;
pub mod providers;

pub use access::{GroupResource, PasswordPolicyResource, RoleResource};
pub use clients::{ClientResource, ClientSecretResource};
pub use providers::AuthProviderResource;

use crate::RauthyProviderData;
use tfplug::resource::{ConfigureResourceRequest, ConfigureResourceResponse};

/// Shared `configure` for every resource: stores the provider data
pub(crate) fn configure_resource(
    slot: &mut Option<RauthyProviderData>,
    request: ConfigureResourceRequest,
) -> ConfigureResourceResponse {
    match RauthyProviderData::from_any(
        request.provider_data,
        "Unexpected Resource Configure Type",
    ) {
        Ok(data) => {
            *slot = data;
            ConfigureResourceResponse {
                diagnostics: vec![],
            }
        }
        Err(diag) => ConfigureResourceResponse {
            diagnostics: vec![diag],
        },
    }
}
