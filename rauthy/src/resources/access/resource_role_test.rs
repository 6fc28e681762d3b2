#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::api::test_helpers::{create_test_client, ROLES_RESPONSE, ROLE_RESPONSE};
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
    use tfplug::types::{AttributePath, Dynamic, DynamicValue};

    fn create_test_provider_data(server_url: &str) -> RauthyProviderData {
        RauthyProviderData::new(create_test_client(server_url))
    }

    async fn configured_resource(server_url: &str) -> RoleResource {
        let mut resource = RoleResource::new();
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

    fn role_value(id: Option<&str>, name: &str) -> DynamicValue {
        let mut value = DynamicValue::object();
        if let Some(id) = id {
            value
                .set_string(&AttributePath::new("id"), id.to_string())
                .unwrap();
        }
        value
            .set_string(&AttributePath::new("name"), name.to_string())
            .unwrap();
        value
    }

    #[test]
    fn test_resource_type_name() {
        assert_eq!(RoleResource::new().type_name(), "rauthy_role");
    }

    #[tokio::test]
    async fn test_validate_rejects_configured_id() {
        let response = RoleResource::new()
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "rauthy_role".to_string(),
                    config: role_value(Some("role-1"), "Role 1"),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "Invalid Configuration for Read-Only Attribute"
        );
    }

    #[tokio::test]
    async fn test_rename_keeps_known_id_in_plan() {
        let schema = RoleResource::new()
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema;

        let change = plan_resource_change(
            &schema,
            &role_value(Some("role-1"), "Role 1"),
            &role_value(None, "Renamed"),
        );

        assert!(change.requires_replace.is_empty());
        assert_eq!(
            change
                .planned_state
                .get_string(&AttributePath::new("id"))
                .unwrap(),
            "role-1"
        );
    }

    #[tokio::test]
    async fn test_create_role() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/roles")
            .match_header("x-api-key", "supersecret")
            .match_body(Matcher::Json(serde_json::json!({"role": "Role 1"})))
            .with_status(200)
            .with_body(ROLE_RESPONSE)
            .create_async()
            .await;

        let mut planned_state = role_value(None, "Role 1");
        planned_state
            .set(&AttributePath::new("id"), Dynamic::Unknown)
            .unwrap();

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "rauthy_role".to_string(),
                    planned_state,
                    config: role_value(None, "Role 1"),
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("id")).unwrap(),
            "role-1"
        );
    }

    #[tokio::test]
    async fn test_read_finds_role_in_listing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/v1/roles")
            .with_status(200)
            .with_body(ROLES_RESPONSE)
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "rauthy_role".to_string(),
                    current_state: role_value(Some("role-2"), "stale"),
                },
            )
            .await;

        mock.assert_async().await;
        let state = response.new_state.unwrap();
        assert_eq!(state.get_string(&AttributePath::new("name")).unwrap(), "Role 2");
    }

    #[tokio::test]
    async fn test_read_removes_missing_role() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/roles")
            .with_status(200)
            .with_body(ROLES_RESPONSE)
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "rauthy_role".to_string(),
                    current_state: role_value(Some("role-9"), "Gone"),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_update_role() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/auth/v1/roles/role-1")
            .match_body(Matcher::Json(serde_json::json!({"role": "Renamed"})))
            .with_status(200)
            .with_body(r#"{"id": "role-1", "name": "Renamed"}"#)
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "rauthy_role".to_string(),
                    prior_state: role_value(Some("role-1"), "Role 1"),
                    planned_state: role_value(Some("role-1"), "Renamed"),
                    config: role_value(None, "Renamed"),
                },
            )
            .await;

        mock.assert_async().await;
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("name")).unwrap(),
            "Renamed"
        );
    }

    #[tokio::test]
    async fn test_delete_reports_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/auth/v1/roles/role-1")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "rauthy_role".to_string(),
                    prior_state: role_value(Some("role-1"), "Role 1"),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0]
            .detail
            .starts_with("Unable to delete role, got error:"));
    }

    #[tokio::test]
    async fn test_import_looks_up_name() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/roles")
            .with_status(200)
            .with_body(ROLES_RESPONSE)
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "rauthy_role".to_string(),
                    id: "role-1".to_string(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        let imported = &response.imported_resources[0];
        assert_eq!(imported.type_name, "rauthy_role");
        assert_eq!(
            imported.state.get_string(&AttributePath::new("name")).unwrap(),
            "Role 1"
        );
    }

    #[tokio::test]
    async fn test_import_unknown_role() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/roles")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let resource = configured_resource(&server.url()).await;
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "rauthy_role".to_string(),
                    id: "role-1".to_string(),
                },
            )
            .await;

        assert!(response.imported_resources.is_empty());
        assert!(response.diagnostics[0].detail.contains("role role-1 not found"));
    }
}
