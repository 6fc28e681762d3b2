//! Password policy API

use serde::{Deserialize, Serialize};
use tfplug::context::Context;

use super::client::Client;
use super::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub length_min: i64,
    pub length_max: i64,
    #[serde(default)]
    pub include_digits: Option<i64>,
    #[serde(default)]
    pub include_lower_case: Option<i64>,
    #[serde(default)]
    pub include_upper_case: Option<i64>,
    #[serde(default)]
    pub include_special: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_recently_used: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_days: Option<i64>,
}

pub struct PasswordPolicyApi<'a> {
    client: &'a Client,
}

impl<'a> PasswordPolicyApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /password_policy
    pub async fn get(&self, ctx: &Context) -> Result<PasswordPolicy, ApiError> {
        self.client.get(ctx, "password_policy").await
    }

    /// PUT /password_policy
    pub async fn update(
        &self,
        ctx: &Context,
        policy: &PasswordPolicy,
    ) -> Result<PasswordPolicy, ApiError> {
        self.client.put(ctx, "password_policy", policy).await
    }
}
