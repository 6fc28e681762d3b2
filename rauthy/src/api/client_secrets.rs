//! Client secret API

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tfplug::context::Context;

use super::client::Client;
use super::common::Payload;
use super::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub id: String,
    #[serde(default)]
    pub confidential: bool,
    #[serde(default)]
    pub secret: Option<String>,
}

/// Request body for rotating a secret
///
/// `cache_current_hours` keeps the previous secret valid for that many hours.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientSecretRequest {
    #[serde(skip_serializing_if = "is_zero")]
    pub cache_current_hours: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

pub struct ClientSecretsApi<'a> {
    client: &'a Client,
}

impl<'a> ClientSecretsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// PUT /clients/{client_id}/secret
    ///
    /// Generates a new secret for the client.
    pub async fn rotate(
        &self,
        ctx: &Context,
        client_id: &str,
        request: &ClientSecretRequest,
    ) -> Result<ClientSecret, ApiError> {
        self.client
            .put(ctx, &format!("clients/{}/secret", client_id), request)
            .await
    }

    /// POST /clients/{client_id}/secret
    ///
    /// Returns the current secret without rotating it.
    pub async fn get(&self, ctx: &Context, client_id: &str) -> Result<ClientSecret, ApiError> {
        self.client
            .request(
                ctx,
                Method::POST,
                &format!("clients/{}/secret", client_id),
                Payload::None,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_client, CLIENT_SECRET_RESPONSE};
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn rotate_omits_zero_cache_hours() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/auth/v1/clients/client-1/secret")
            .match_body(Matcher::Json(serde_json::json!({})))
            .with_body(CLIENT_SECRET_RESPONSE)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let secret = client
            .client_secrets()
            .rotate(&Context::new(), "client-1", &ClientSecretRequest::default())
            .await
            .unwrap();

        assert_eq!(secret.id, "client-1");
        assert!(secret.confidential);
        assert_eq!(secret.secret.as_deref(), Some("s3cr3t"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rotate_sends_cache_hours() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/auth/v1/clients/client-1/secret")
            .match_body(Matcher::Json(serde_json::json!({"cache_current_hours": 2})))
            .with_body(CLIENT_SECRET_RESPONSE)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .client_secrets()
            .rotate(
                &Context::new(),
                "client-1",
                &ClientSecretRequest {
                    cache_current_hours: 2,
                },
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_reads_current_secret() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/clients/client-1/secret")
            .with_body(CLIENT_SECRET_RESPONSE)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let secret = client
            .client_secrets()
            .get(&Context::new(), "client-1")
            .await
            .unwrap();

        assert_eq!(secret.secret.as_deref(), Some("s3cr3t"));
        mock.assert_async().await;
    }
}
