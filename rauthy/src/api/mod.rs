//! Rauthy admin REST API client

pub mod auth_providers;
pub mod client;
pub mod client_secrets;
pub mod clients;
pub mod common;
pub mod error;
pub mod groups;
pub mod password_policy;
pub mod roles;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use auth_providers::AuthProvider;
pub use client::{ApiKeyAuthenticator, Authenticator, Client, ClientConfig};
pub use client_secrets::{ClientSecret, ClientSecretRequest};
pub use clients::{CreateOidcClientPayload, OidcClient};
pub use common::{ApiQueryParams, Payload};
pub use error::ApiError;
pub use groups::{Group, GroupRequest};
pub use password_policy::PasswordPolicy;
pub use roles::{Role, RoleRequest};
