//! Upstream auth provider API

use serde::{Deserialize, Serialize};
use tfplug::context::Context;

use super::client::Client;
use super::error::ApiError;

/// Upstream OIDC identity provider configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthProvider {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub typ: String,
    pub issuer: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_claim_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_claim_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfa_claim_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfa_claim_value: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub auto_link: bool,
    #[serde(default)]
    pub auto_onboarding: bool,
    #[serde(default)]
    pub client_secret_basic: bool,
    #[serde(default)]
    pub client_secret_post: bool,
    #[serde(default)]
    pub use_pkce: bool,
}

pub struct AuthProvidersApi<'a> {
    client: &'a Client,
}

impl<'a> AuthProvidersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /providers
    pub async fn list(&self, ctx: &Context) -> Result<Vec<AuthProvider>, ApiError> {
        self.client.get(ctx, "providers").await
    }

    /// Look a provider up by id in the provider listing
    pub async fn get(&self, ctx: &Context, id: &str) -> Result<AuthProvider, ApiError> {
        self.list(ctx)
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("no provider found with id {}", id)))
    }

    /// POST /providers/create
    pub async fn create(
        &self,
        ctx: &Context,
        provider: &AuthProvider,
    ) -> Result<AuthProvider, ApiError> {
        self.client.post(ctx, "providers/create", provider).await
    }

    /// PUT /providers/{id}
    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        provider: &AuthProvider,
    ) -> Result<AuthProvider, ApiError> {
        self.client
            .put(ctx, &format!("providers/{}", id), provider)
            .await
    }

    /// DELETE /providers/{id}
    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<(), ApiError> {
        self.client.delete(ctx, &format!("providers/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_client, AUTH_PROVIDERS_RESPONSE, AUTH_PROVIDER_RESPONSE};
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn get_filters_listing_by_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/v1/providers")
            .with_body(AUTH_PROVIDERS_RESPONSE)
            .expect(2)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let provider = client
            .auth_providers()
            .get(&Context::new(), "provider-2")
            .await
            .unwrap();
        assert_eq!(provider.name, "Provider 2");
        assert_eq!(provider.scope.as_deref(), Some("openid email"));

        let err = client
            .auth_providers()
            .get(&Context::new(), "provider-3")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no provider found with id provider-3");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_posts_to_create_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/providers/create")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "Provider 1",
                "typ": "oidc",
                "client_secret": "upstream-secret",
                "use_pkce": true
            })))
            .with_body(AUTH_PROVIDER_RESPONSE)
            .create_async()
            .await;

        let provider = AuthProvider {
            name: "Provider 1".to_string(),
            typ: "oidc".to_string(),
            issuer: "https://idp.example.com".to_string(),
            client_id: "rauthy".to_string(),
            client_secret: Some("upstream-secret".to_string()),
            use_pkce: true,
            ..Default::default()
        };

        let client = create_test_client(&server.url());
        let created = client
            .auth_providers()
            .create(&Context::new(), &provider)
            .await
            .unwrap();

        assert_eq!(created.id, "provider-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_and_delete_use_provider_id() {
        let mut server = Server::new_async().await;
        let update = server
            .mock("PUT", "/auth/v1/providers/provider-1")
            .with_body(AUTH_PROVIDER_RESPONSE)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/auth/v1/providers/provider-1")
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let api = client.auth_providers();
        api.update(&Context::new(), "provider-1", &AuthProvider::default())
            .await
            .unwrap();
        api.delete(&Context::new(), "provider-1").await.unwrap();

        update.assert_async().await;
        delete.assert_async().await;
    }
}
