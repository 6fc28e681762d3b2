//! Group API

use serde::{Deserialize, Serialize};
use tfplug::context::Context;

use super::client::Client;
use super::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRequest {
    pub group: String,
}

pub struct GroupsApi<'a> {
    client: &'a Client,
}

impl<'a> GroupsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /groups
    pub async fn list(&self, ctx: &Context) -> Result<Vec<Group>, ApiError> {
        self.client.get(ctx, "groups").await
    }

    /// Look a group up by id in the group listing
    pub async fn get(&self, ctx: &Context, id: &str) -> Result<Group, ApiError> {
        self.list(ctx)
            .await?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("group {} not found", id)))
    }

    /// POST /groups
    pub async fn create(&self, ctx: &Context, request: &GroupRequest) -> Result<Group, ApiError> {
        self.client.post(ctx, "groups", request).await
    }

    /// PUT /groups/{id}
    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        request: &GroupRequest,
    ) -> Result<Group, ApiError> {
        self.client.put(ctx, &format!("groups/{}", id), request).await
    }

    /// DELETE /groups/{id}
    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<(), ApiError> {
        self.client.delete(ctx, &format!("groups/{}", id)).await
    }
}
