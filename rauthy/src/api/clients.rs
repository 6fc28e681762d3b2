//! OIDC client API

use serde::{Deserialize, Serialize};
use tfplug::context::Context;

use super::client::Client;
use super::error::ApiError;

/// OIDC client as returned by `GET /clients/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OidcClient {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub confidential: bool,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uris: Option<Vec<String>>,
    #[serde(default)]
    pub flows_enabled: Vec<String>,
    pub access_token_alg: String,
    pub id_token_alg: String,
    pub auth_code_lifetime: i64,
    pub access_token_lifetime: i64,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub default_scopes: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub force_mfa: bool,
    #[serde(default)]
    pub client_uri: Option<String>,
    #[serde(default)]
    pub contacts: Option<Vec<String>>,
}

/// Request body for `POST /clients`
#[derive(Debug, Clone, Serialize)]
pub struct CreateOidcClientPayload {
    pub id: String,
    pub confidential: bool,
    pub name: String,
    pub redirect_uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uris: Option<Vec<String>>,
}

impl OidcClient {
    pub fn to_create_payload(&self) -> CreateOidcClientPayload {
        CreateOidcClientPayload {
            id: self.id.clone(),
            confidential: self.confidential,
            name: self.name.clone(),
            redirect_uris: self.redirect_uris.clone(),
            post_logout_redirect_uris: self.post_logout_redirect_uris.clone(),
        }
    }
}

pub struct ClientsApi<'a> {
    client: &'a Client,
}

impl<'a> ClientsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /clients/{id}
    pub async fn get(&self, ctx: &Context, id: &str) -> Result<OidcClient, ApiError> {
        self.client.get(ctx, &format!("clients/{}", id)).await
    }

    /// POST /clients
    pub async fn create(
        &self,
        ctx: &Context,
        payload: &CreateOidcClientPayload,
    ) -> Result<OidcClient, ApiError> {
        self.client.post(ctx, "clients", payload).await
    }

    /// PUT /clients/{id}
    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        client: &OidcClient,
    ) -> Result<OidcClient, ApiError> {
        self.client.put(ctx, &format!("clients/{}", id), client).await
    }

    /// DELETE /clients/{id}
    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<(), ApiError> {
        self.client.delete(ctx, &format!("clients/{}", id)).await
    }
}
