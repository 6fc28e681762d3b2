use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tfplug::context::Context;

use super::common::Payload;
use super::error::ApiError;

/// Path prefix of every Rauthy admin API route
pub const API_PREFIX: &str = "auth/v1";

/// Attaches credentials to outgoing requests
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Authenticates with a Rauthy API key via the `X-API-Key` header
pub struct ApiKeyAuthenticator {
    api_key: String,
}

impl ApiKeyAuthenticator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Authenticator for ApiKeyAuthenticator {
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("X-API-Key", &self.api_key)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Rauthy API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    authenticator: Box<dyn Authenticator>,
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(endpoint: &str, api_key: &str, insecure: bool) -> Result<Self, ApiError> {
        Self::with_config(
            endpoint,
            Box::new(ApiKeyAuthenticator::new(api_key)),
            insecure,
            ClientConfig::default(),
        )
    }

    pub fn with_config(
        endpoint: &str,
        authenticator: Box<dyn Authenticator>,
        insecure: bool,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        url::Url::parse(endpoint)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: endpoint.trim_end_matches('/').to_string(),
                authenticator,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.inner.base_url,
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// OIDC client operations
    pub fn clients(&self) -> super::clients::ClientsApi<'_> {
        super::clients::ClientsApi::new(self)
    }

    /// Client secret operations
    pub fn client_secrets(&self) -> super::client_secrets::ClientSecretsApi<'_> {
        super::client_secrets::ClientSecretsApi::new(self)
    }

    /// Upstream auth provider operations
    pub fn auth_providers(&self) -> super::auth_providers::AuthProvidersApi<'_> {
        super::auth_providers::AuthProvidersApi::new(self)
    }

    /// Role operations
    pub fn roles(&self) -> super::roles::RolesApi<'_> {
        super::roles::RolesApi::new(self)
    }

    /// Group operations
    pub fn groups(&self) -> super::groups::GroupsApi<'_> {
        super::groups::GroupsApi::new(self)
    }

    /// Password policy operations
    pub fn password_policy(&self) -> super::password_policy::PasswordPolicyApi<'_> {
        super::password_policy::PasswordPolicyApi::new(self)
    }

    pub async fn get<T: DeserializeOwned>(&self, ctx: &Context, path: &str) -> Result<T, ApiError> {
        self.request(ctx, Method::GET, path, Payload::None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &Context,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = encode(&Method::POST, path, body)?;
        self.request(ctx, Method::POST, path, payload).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &Context,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = encode(&Method::PUT, path, body)?;
        self.request(ctx, Method::PUT, path, payload).await
    }

    /// Sends a JSON `null` body, which Rauthy accepts on deletes
    pub async fn delete(&self, ctx: &Context, path: &str) -> Result<(), ApiError> {
        self.request_empty(ctx, Method::DELETE, path, Payload::Json(serde_json::Value::Null))
            .await
    }

    /// Execute a request and decode the JSON response body
    pub async fn request<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<T, ApiError> {
        let response = self.send(ctx, method.clone(), path, payload).await?;

        let text = tokio::select! {
            text = response.text() => text?,
            _ = ctx.cancelled() => return Err(ApiError::Cancelled),
        };

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(%method, path, "failed to decode response: {}", e);
            ApiError::Decode {
                method: method.to_string(),
                path: path.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Execute a request and ignore the response body
    pub async fn request_empty(
        &self,
        ctx: &Context,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<(), ApiError> {
        self.send(ctx, method, path, payload).await.map(|_| ())
    }

    async fn send(
        &self,
        ctx: &Context,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<reqwest::Response, ApiError> {
        if ctx.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let mut url = self.url_for(path);
        let writes_body = matches!(method, Method::PUT | Method::POST | Method::DELETE);

        let body = match (writes_body, payload) {
            (_, Payload::None) => None,
            (true, Payload::Json(value)) => Some(serde_json::to_vec(&value).map_err(|e| {
                ApiError::Encode {
                    method: method.to_string(),
                    path: path.to_string(),
                    message: e.to_string(),
                }
            })?),
            (false, Payload::Query(params)) => {
                url.push_str(&params.to_query_string());
                None
            }
            (true, Payload::Query(_)) | (false, Payload::Json(_)) => {
                return Err(ApiError::Encode {
                    method: method.to_string(),
                    path: path.to_string(),
                    message: "payload kind does not match request method".to_string(),
                });
            }
        };

        tracing::debug!(%method, %url, "sending request");

        let mut builder = self
            .inner
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let builder = self.inner.authenticator.authenticate(builder);

        let response = tokio::select! {
            response = builder.send() => response?,
            _ = ctx.cancelled() => return Err(ApiError::Cancelled),
        };

        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "received response");

        if status.as_u16() >= 300 {
            let body = tokio::select! {
                text = response.text() => text.unwrap_or_else(|e| format!("<unreadable body: {}>", e)),
                _ = ctx.cancelled() => return Err(ApiError::Cancelled),
            };
            tracing::error!(%method, path, status = status.as_u16(), "API error response: {}", body);
            return Err(ApiError::Api {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

fn encode<B: Serialize>(method: &Method, path: &str, body: &B) -> Result<Payload, ApiError> {
    Payload::json(body).map_err(|e| ApiError::Encode {
        method: method.to_string(),
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ApiQueryParams;
    use mockito::{Matcher, Server};

    #[derive(Debug, serde::Deserialize)]
    struct Echo {
        id: String,
    }

    #[tokio::test]
    async fn client_sends_api_key_and_json_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/v1/roles")
            .match_header("x-api-key", "supersecret")
            .match_header("content-type", "application/json")
            .match_header("accept", "application/json")
            .with_body(r#"{"id":"role-1"}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "supersecret", false).unwrap();
        let echo: Echo = client.get(&Context::new(), "/roles").await.unwrap();

        assert_eq!(echo.id, "role-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_strips_trailing_slash_from_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/auth/v1/groups/group-1")
            .create_async()
            .await;

        let client = Client::new(&format!("{}/", server.url()), "key", false).unwrap();
        client
            .delete(&Context::new(), "groups/group-1")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_sends_json_body_on_writes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/roles")
            .match_body(Matcher::Json(serde_json::json!({"role": "Role 1"})))
            .with_body(r#"{"id":"role-1"}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        let echo: Echo = client
            .post(
                &Context::new(),
                "roles",
                &serde_json::json!({"role": "Role 1"}),
            )
            .await
            .unwrap();

        assert_eq!(echo.id, "role-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_encodes_query_on_reads() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/v1/roles")
            .match_query(Matcher::UrlEncoded("name".into(), "Role 1".into()))
            .with_body(r#"{"id":"role-1"}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        let _: Echo = client
            .request(
                &Context::new(),
                Method::GET,
                "roles",
                Payload::Query(ApiQueryParams::new().add("name", "Role 1")),
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_rejects_query_payload_on_writes() {
        let client = Client::new("http://localhost:8080", "key", false).unwrap();
        let result = client
            .request_empty(
                &Context::new(),
                Method::PUT,
                "roles/role-1",
                Payload::Query(ApiQueryParams::new().add("a", "b")),
            )
            .await;

        assert!(matches!(result, Err(ApiError::Encode { .. })));
    }

    #[tokio::test]
    async fn client_reports_status_and_body_on_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/clients/missing")
            .with_status(404)
            .with_body(r#"{"error":"NotFound","message":"client not found"}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        let result: Result<Echo, _> = client.get(&Context::new(), "clients/missing").await;

        let err = result.unwrap_err();
        assert!(err.is_not_found());
        let message = err.to_string();
        assert!(message.contains("GET"));
        assert!(message.contains("clients/missing"));
        assert!(message.contains("404"));
        assert!(message.contains("client not found"));
    }

    #[tokio::test]
    async fn client_reports_decode_failures() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/roles")
            .with_body("not json")
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        let result: Result<Echo, _> = client.get(&Context::new(), "roles").await;

        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[tokio::test]
    async fn client_ignores_body_when_no_response_expected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/auth/v1/roles/role-1")
            .with_body("not json either")
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        tokio_test::assert_ok!(client.delete(&Context::new(), "roles/role-1").await);
    }

    #[tokio::test]
    async fn client_stops_on_cancelled_context() {
        let client = Client::new("http://localhost:8080", "key", false).unwrap();
        let ctx = Context::new();
        ctx.cancel();

        let result: Result<Echo, _> = client.get(&ctx, "roles").await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    async fn cancel_after(ctx: &Context, delay: Duration) {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            ctx.cancel();
        });
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_aborts_in_flight_request_on_cancel() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/roles")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(br#"{"id":"role-1"}"#)
            })
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        let ctx = Context::new();
        cancel_after(&ctx, Duration::from_millis(200)).await;

        let started = std::time::Instant::now();
        let result: Result<Echo, _> = client.get(&ctx, "roles").await;

        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_aborts_slow_error_body_on_cancel() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/auth/v1/roles/role-1")
            .with_status(500)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(b"internal error")
            })
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        let ctx = Context::new();
        cancel_after(&ctx, Duration::from_millis(200)).await;

        let result = client.delete(&ctx, "roles/role-1").await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn client_sends_null_body_on_delete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/auth/v1/clients/app")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Exact("null".to_string()))
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key", false).unwrap();
        client.delete(&Context::new(), "clients/app").await.unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn client_rejects_invalid_endpoint() {
        let result = Client::new("not a url", "key", false);
        assert!(matches!(result, Err(ApiError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn client_handles_network_errors() {
        let client = Client::new("http://localhost:1", "key", false).unwrap();
        let result: Result<Echo, _> = client.get(&Context::new(), "roles").await;
        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
