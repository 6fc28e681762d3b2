pub mod resource_auth_provider;

#[cfg(test)]
mod resource_auth_provider_test;

pub use resource_auth_provider::AuthProviderResource;
