//! Test helpers and response fixtures for the Rauthy API

pub const TEST_API_KEY: &str = "supersecret";

pub fn create_test_client(url: &str) -> super::Client {
    super::Client::new(url, TEST_API_KEY, false).unwrap()
}

pub const CLIENT_RESPONSE: &str = r#"{
    "id": "client-1",
    "name": "Client 1",
    "enabled": true,
    "confidential": false,
    "redirect_uris": ["https://app.example.com/callback"],
    "flows_enabled": ["authorization_code"],
    "access_token_alg": "EdDSA",
    "id_token_alg": "EdDSA",
    "auth_code_lifetime": 60,
    "access_token_lifetime": 1800,
    "scopes": ["openid"],
    "default_scopes": ["openid"],
    "challenges": ["S256"],
    "force_mfa": false,
    "client_uri": null,
    "contacts": null
}"#;

pub const CLIENT_SECRET_RESPONSE: &str = r#"{
    "id": "client-1",
    "confidential": true,
    "secret": "s3cr3t"
}"#;

pub const AUTH_PROVIDER_RESPONSE: &str = r#"{
    "id": "provider-1",
    "name": "Provider 1",
    "typ": "oidc",
    "issuer": "https://idp.example.com",
    "client_id": "rauthy",
    "authorization_endpoint": "https://idp.example.com/authorize",
    "token_endpoint": "https://idp.example.com/token",
    "userinfo_endpoint": "https://idp.example.com/userinfo",
    "jwks_endpoint": "https://idp.example.com/jwks",
    "scope": "openid",
    "admin_claim_path": "",
    "admin_claim_value": "",
    "mfa_claim_path": "",
    "mfa_claim_value": "",
    "enabled": true,
    "auto_link": false,
    "auto_onboarding": false,
    "client_secret_basic": true,
    "client_secret_post": false,
    "use_pkce": true
}"#;

pub const AUTH_PROVIDERS_RESPONSE: &str = r#"[
    {
        "id": "provider-1",
        "name": "Provider 1",
        "typ": "oidc",
        "issuer": "https://idp.example.com",
        "client_id": "rauthy",
        "enabled": true,
        "use_pkce": true
    },
    {
        "id": "provider-2",
        "name": "Provider 2",
        "typ": "github",
        "issuer": "https://github.com",
        "client_id": "rauthy-gh",
        "scope": "openid email",
        "enabled": false
    }
]"#;

pub const ROLE_RESPONSE: &str = r#"{"id": "role-1", "name": "Role 1"}"#;

pub const ROLES_RESPONSE: &str = r#"[
    {"id": "role-1", "name": "Role 1"},
    {"id": "role-2", "name": "Role 2"}
]"#;

pub const GROUP_RESPONSE: &str = r#"{"id": "group-1", "name": "Group 1"}"#;

pub const GROUPS_RESPONSE: &str = r#"[
    {"id": "group-1", "name": "Group 1"},
    {"id": "group-2", "name": "Group 2"}
]"#;

pub const PASSWORD_POLICY_RESPONSE: &str = r#"{
    "length_min": 8,
    "length_max": 128,
    "include_digits": 1,
    "include_lower_case": 1,
    "include_upper_case": 1,
    "include_special": 0
}"#;

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout.as_secs(), 30);
        assert_eq!(config.connect_timeout.as_secs(), 10);
    }

    #[test]
    fn fixtures_decode_into_models() {
        let _: OidcClient = serde_json::from_str(super::CLIENT_RESPONSE).unwrap();
        let _: ClientSecret = serde_json::from_str(super::CLIENT_SECRET_RESPONSE).unwrap();
        let _: Vec<AuthProvider> = serde_json::from_str(super::AUTH_PROVIDERS_RESPONSE).unwrap();
        let _: Vec<Role> = serde_json::from_str(super::ROLES_RESPONSE).unwrap();
        let _: Vec<Group> = serde_json::from_str(super::GROUPS_RESPONSE).unwrap();
        let _: PasswordPolicy = serde_json::from_str(super::PASSWORD_POLICY_RESPONSE).unwrap();
    }

    #[test]
    fn api_error_formatting() {
        let error = ApiError::Api {
            method: "PUT".to_string(),
            path: "roles/role-1".to_string(),
            status: 400,
            body: "Bad Request".to_string(),
        };

        let error_str = error.to_string();
        assert!(error_str.contains("PUT roles/role-1"));
        assert!(error_str.contains("HTTP 400"));
        assert!(error_str.contains("Bad Request"));
        assert!(!error.is_not_found());
    }
}
