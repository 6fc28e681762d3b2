//! Role API

use serde::{Deserialize, Serialize};
use tfplug::context::Context;

use super::client::Client;
use super::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleRequest {
    pub role: String,
}

pub struct RolesApi<'a> {
    client: &'a Client,
}

impl<'a> RolesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /roles
    pub async fn list(&self, ctx: &Context) -> Result<Vec<Role>, ApiError> {
        self.client.get(ctx, "roles").await
    }

    /// Look a role up by id in the role listing
    pub async fn get(&self, ctx: &Context, id: &str) -> Result<Role, ApiError> {
        self.list(ctx)
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("role {} not found", id)))
    }

    /// POST /roles
    pub async fn create(&self, ctx: &Context, request: &RoleRequest) -> Result<Role, ApiError> {
        self.client.post(ctx, "roles", request).await
    }

    /// PUT /roles/{id}
    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        request: &RoleRequest,
    ) -> Result<Role, ApiError> {
        self.client.put(ctx, &format!("roles/{}", id), request).await
    }

    /// DELETE /roles/{id}
    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<(), ApiError> {
        self.client.delete(ctx, &format!("roles/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_client, ROLES_RESPONSE, ROLE_RESPONSE};
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn create_role() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/roles")
            .match_body(Matcher::Json(serde_json::json!({"role": "Role 1"})))
            .with_body(ROLE_RESPONSE)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let role = client
            .roles()
            .create(
                &Context::new(),
                &RoleRequest {
                    role: "Role 1".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(role.id, "role-1");
        assert_eq!(role.name, "Role 1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_roles() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/roles")
            .with_body(ROLES_RESPONSE)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let roles = client.roles().list(&Context::new()).await.unwrap();

        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].id, "role-1");
        assert_eq!(roles[1].id, "role-2");
    }

    #[tokio::test]
    async fn get_role_by_id() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/roles")
            .with_body(ROLES_RESPONSE)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let role = client.roles().get(&Context::new(), "role-1").await.unwrap();
        assert_eq!(role.name, "Role 1");

        let err = client
            .roles()
            .get(&Context::new(), "role-3")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("role role-3 not found"));
    }

    #[tokio::test]
    async fn update_role() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/auth/v1/roles/role-1")
            .match_body(Matcher::Json(serde_json::json!({"role": "Role 1 Updated"})))
            .with_body(ROLE_RESPONSE)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let role = client
            .roles()
            .update(
                &Context::new(),
                "role-1",
                &RoleRequest {
                    role: "Role 1 Updated".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(role.id, "role-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_role() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/auth/v1/roles/role-1")
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        tokio_test::assert_ok!(client.roles().delete(&Context::new(), "role-1").await);
        mock.assert_async().await;
    }
}
