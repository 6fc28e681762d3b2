//! Provider data structure passed to resources and data sources

use crate::api::{ApiError, Client};
use std::any::Any;
use std::sync::Arc;
use tfplug::types::Diagnostic;

#[derive(Clone)]
pub struct RauthyProviderData {
    pub client: Arc<Client>,
}

impl RauthyProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Extracts provider data handed to a resource or data source
    ///
    /// `None` is accepted: the host configures components before the provider
    /// while validating. Any other payload type is an error with `summary`.
    pub fn from_any(
        data: Option<Arc<dyn Any + Send + Sync>>,
        summary: &str,
    ) -> Result<Option<Self>, Diagnostic> {
        let Some(data) = data else {
            return Ok(None);
        };

        data.downcast_ref::<RauthyProviderData>()
            .cloned()
            .map(Some)
            .ok_or_else(|| {
                Diagnostic::error(
                    summary,
                    "Expected RauthyProviderData. Please report this issue to the provider developers.",
                )
            })
    }
}

pub fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

/// Error diagnostic for a failed API call, e.g. `action` = "create role"
pub fn client_error(action: &str, err: &ApiError) -> Diagnostic {
    Diagnostic::error(
        "Client Error",
        format!("Unable to {}, got error: {}", action, err),
    )
}
