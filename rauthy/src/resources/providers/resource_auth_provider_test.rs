#[cfg(test)]
mod tests {
    use super::super::resource_auth_provider::{
        provider_from_plan, write_provider_state, CLAIM_ATTRIBUTES, ENDPOINT_ATTRIBUTES,
        FLAG_ATTRIBUTES,
    };
    use super::super::*;
    use crate::api::AuthProvider;
    use crate::api::test_helpers::{
        create_test_client, AUTH_PROVIDERS_RESPONSE, AUTH_PROVIDER_RESPONSE,
    };
    use crate::RauthyProviderData;
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use tfplug::context::Context;
    use tfplug::plan::plan_resource_change;
    use tfplug::resource::{
        ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest,
        ImportResourceStateRequest, ReadResourceRequest, Resource, ResourceSchemaRequest,
        ResourceWithConfigure, UpdateResourceRequest, ValidateResourceConfigRequest,
    };
    use tfplug::types::{AttributePath, DynamicValue};

    fn create_test_provider_data(server_url: &str) -> RauthyProviderData {
        RauthyProviderData::new(create_test_client(server_url))
    }

    async fn configured_resource(server_url: &str) -> AuthProviderResource {
        let mut resource = AuthProviderResource::new();
        resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(Arc::new(create_test_provider_data(server_url))),
                },
            )
            .await;
        resource
    }

    fn config() -> DynamicValue {
        let mut config = DynamicValue::object();
        for (name, value) in [
            ("id", "provider-1"),
            ("name", "Provider 1"),
            ("typ", "oidc"),
            ("issuer", "https://idp.example.com"),
            ("client_id", "rauthy"),
            ("client_secret", "upstream-secret"),
            ("authorization_endpoint", "https://idp.example.com/authorize"),
            ("token_endpoint", "https://idp.example.com/token"),
            ("userinfo_endpoint", "https://idp.example.com/userinfo"),
            ("jwks_endpoint", "https://idp.example.com/jwks"),
            ("scope", "openid"),
        ] {
            config
                .set_string(&AttributePath::new(name), value.to_string())
                .unwrap();
        }
        config
    }

    async fn planned() -> DynamicValue {
        let schema = AuthProviderResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema;
        plan_resource_change(&schema, &DynamicValue::null(), &config()).planned_state
    }

    #[tokio::test]
    async fn test_resource_schema() {
        let response = AuthProviderResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await;

        let attrs = &response.schema.block.attributes;
        assert!(attrs
            .iter()
            .any(|a| a.name == "client_secret" && a.required && a.sensitive));
        assert!(attrs
            .iter()
            .any(|a| a.name == "use_pkce" && a.optional && a.computed));
        assert!(attrs
            .iter()
            .any(|a| a.name == "jwks_endpoint" && a.optional && !a.computed));
    }

    #[tokio::test]
    async fn test_validate_rejects_non_http_endpoint() {
        let mut config = config();
        config
            .set_string(
                &AttributePath::new("token_endpoint"),
                "ftp://idp.example.com/token".to_string(),
            )
            .unwrap();

        let response = AuthProviderResource::new()
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    config,
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].attribute,
            Some(AttributePath::new("token_endpoint"))
        );
    }

    #[tokio::test]
    async fn test_validate_accepts_plain_http_endpoint() {
        let mut config = config();
        config
            .set_string(
                &AttributePath::new("token_endpoint"),
                "http://localhost:8080/token".to_string(),
            )
            .unwrap();

        let response = AuthProviderResource::new()
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    config,
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
    }

    #[test]
    fn test_attribute_tables_follow_model_fields() {
        let provider = AuthProvider {
            id: "provider-1".to_string(),
            name: "Provider 1".to_string(),
            typ: "oidc".to_string(),
            issuer: "https://idp.example.com".to_string(),
            client_id: "rauthy".to_string(),
            client_secret: None,
            authorization_endpoint: Some("authorization_endpoint".to_string()),
            token_endpoint: Some("token_endpoint".to_string()),
            userinfo_endpoint: Some("userinfo_endpoint".to_string()),
            jwks_endpoint: Some("jwks_endpoint".to_string()),
            scope: Some("scope".to_string()),
            admin_claim_path: Some("admin_claim_path".to_string()),
            admin_claim_value: Some("admin_claim_value".to_string()),
            mfa_claim_path: Some("mfa_claim_path".to_string()),
            mfa_claim_value: Some("mfa_claim_value".to_string()),
            enabled: false,
            auto_link: true,
            auto_onboarding: true,
            client_secret_basic: false,
            client_secret_post: true,
            use_pkce: false,
        };

        let mut state = DynamicValue::object();
        write_provider_state(&mut state, &provider).unwrap();

        for attr in ENDPOINT_ATTRIBUTES.iter().chain(CLAIM_ATTRIBUTES) {
            assert_eq!(
                state.get_string(&AttributePath::new(attr.name)).unwrap(),
                attr.name
            );
        }
        for attr in FLAG_ATTRIBUTES {
            assert_eq!(
                state.get_bool(&AttributePath::new(attr.name)).unwrap(),
                !attr.default,
                "{}",
                attr.name
            );
        }
        assert_eq!(provider_from_plan(&state).unwrap(), provider);
    }

    #[tokio::test]
    async fn test_create_keeps_unechoed_secret() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/providers/create")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "id": "provider-1",
                "client_secret": "upstream-secret",
                "enabled": true,
                "client_secret_basic": true,
                "use_pkce": true,
            })))
            .with_status(200)
            .with_body(AUTH_PROVIDER_RESPONSE)
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    planned_state: planned().await,
                    config: config(),
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.new_state;
        assert_eq!(
            state.get_string(&AttributePath::new("client_secret")).unwrap(),
            "upstream-secret"
        );
        assert!(state
            .get(&AttributePath::new("admin_claim_path"))
            .unwrap()
            .is_null());
        assert!(!state.get_bool(&AttributePath::new("auto_link")).unwrap());
    }

    #[tokio::test]
    async fn test_read_filters_listing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/v1/providers")
            .with_status(200)
            .with_body(AUTH_PROVIDERS_RESPONSE)
            .create_async()
            .await;

        let mut current_state = config();
        current_state
            .set_string(&AttributePath::new("id"), "provider-2".to_string())
            .unwrap();

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    current_state,
                },
            )
            .await;

        mock.assert_async().await;
        let state = response.new_state.unwrap();
        assert_eq!(state.get_string(&AttributePath::new("name")).unwrap(), "Provider 2");
        assert_eq!(
            state.get_string(&AttributePath::new("scope")).unwrap(),
            "openid email"
        );
        assert_eq!(
            state.get_string(&AttributePath::new("client_secret")).unwrap(),
            "upstream-secret"
        );
    }

    #[tokio::test]
    async fn test_read_removes_missing_provider() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/providers")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    current_state: config(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_update_puts_model() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/auth/v1/providers/provider-1")
            .match_body(Matcher::PartialJson(serde_json::json!({"auto_onboarding": true})))
            .with_status(200)
            .with_body(
                AUTH_PROVIDER_RESPONSE.replace("\"auto_onboarding\": false", "\"auto_onboarding\": true"),
            )
            .create_async()
            .await;

        let mut planned_state = planned().await;
        planned_state
            .set_bool(&AttributePath::new("auto_onboarding"), true)
            .unwrap();

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    prior_state: planned().await,
                    planned_state,
                    config: config(),
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response
            .new_state
            .get_bool(&AttributePath::new("auto_onboarding"))
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_provider() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/auth/v1/providers/provider-1")
            .with_status(200)
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    prior_state: config(),
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_import_passes_id_through() {
        let response = AuthProviderResource::new()
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "rauthy_auth_provider".to_string(),
                    id: "provider-1".to_string(),
                },
            )
            .await;

        assert_eq!(
            response.imported_resources[0]
                .state
                .get_string(&AttributePath::new("id"))
                .unwrap(),
            "provider-1"
        );
    }
}
