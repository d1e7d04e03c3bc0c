// ABOUTME: OIDC discovery client fetching provider metadata from the well-known endpoint
// ABOUTME: Validates that the endpoints the flow depends on are actually published
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! `OIDC` provider metadata discovery
//!
//! One GET against `https://{host}/.well-known/openid-configuration`, no
//! retries. The metadata fields default to empty rather than failing
//! deserialization so that an absent endpoint is reported as a configuration
//! problem instead of a parse error.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::DISCOVERY_PATH;
use crate::errors::{AuthFlowError, AuthResult};

/// Provider metadata from the well-known configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Issuer identifier
    #[serde(default)]
    pub issuer: String,
    /// Authorization endpoint the browser is sent to
    #[serde(default)]
    pub authorization_endpoint: String,
    /// Token endpoint for the code exchange
    #[serde(default)]
    pub token_endpoint: String,
    /// JSON Web Key Set URL
    #[serde(default)]
    pub jwks_uri: String,
    /// Optional userinfo endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,
    /// Scopes the provider advertises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes_supported: Option<Vec<String>>,
    /// Response types the provider advertises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_types_supported: Option<Vec<String>>,
    /// `PKCE` challenge methods the provider advertises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_challenge_methods_supported: Option<Vec<String>>,
}

impl ProviderMetadata {
    /// Check that the endpoints the flow depends on are present.
    ///
    /// # Errors
    ///
    /// Returns [`AuthFlowError::DiscoveryInvalidConfig`] naming the first
    /// missing endpoint.
    pub fn validate(&self) -> AuthResult<()> {
        if self.authorization_endpoint.is_empty() {
            return Err(AuthFlowError::DiscoveryInvalidConfig {
                field: "authorization_endpoint",
            });
        }
        if self.token_endpoint.is_empty() {
            return Err(AuthFlowError::DiscoveryInvalidConfig {
                field: "token_endpoint",
            });
        }
        Ok(())
    }
}

/// Discover provider metadata for an environment host.
///
/// The host is used as given; the scheme is always `https`.
///
/// # Errors
///
/// Returns an error if the request fails, the endpoint answers with a
/// non-success status, the body is not valid JSON, or a required endpoint is
/// missing from the document.
pub async fn discover_configuration(env_host: &str, client: &Client) -> AuthResult<ProviderMetadata> {
    let well_known_url = format!("https://{env_host}{DISCOVERY_PATH}");
    info!("Fetching OIDC configuration from: {well_known_url}");
    fetch_metadata(&well_known_url, client).await
}

/// Fetch and validate provider metadata from a full URL.
///
/// # Errors
///
/// Same failure modes as [`discover_configuration`].
pub async fn fetch_metadata(url: &str, client: &Client) -> AuthResult<ProviderMetadata> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AuthFlowError::transport("OIDC discovery", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthFlowError::DiscoveryHttp {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_owned(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| AuthFlowError::transport("OIDC discovery", e))?;
    let metadata: ProviderMetadata =
        serde_json::from_str(&body).map_err(|source| AuthFlowError::ResponseParse {
            context: "OIDC discovery",
            source,
        })?;

    metadata.validate()?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(authorization_endpoint: &str, token_endpoint: &str) -> ProviderMetadata {
        ProviderMetadata {
            issuer: "https://idp.example.com".into(),
            authorization_endpoint: authorization_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            jwks_uri: "https://idp.example.com/keys".into(),
            userinfo_endpoint: None,
            scopes_supported: None,
            response_types_supported: None,
            code_challenge_methods_supported: None,
        }
    }

    #[test]
    fn validate_accepts_complete_metadata() {
        let meta = metadata(
            "https://idp.example.com/oauth/authorize",
            "https://idp.example.com/oauth/token",
        );
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_authorization_endpoint() {
        let err = metadata("", "https://idp.example.com/oauth/token")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            AuthFlowError::DiscoveryInvalidConfig {
                field: "authorization_endpoint"
            }
        ));
    }

    #[test]
    fn validate_rejects_missing_token_endpoint() {
        let err = metadata("https://idp.example.com/oauth/authorize", "")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            AuthFlowError::DiscoveryInvalidConfig {
                field: "token_endpoint"
            }
        ));
    }

    #[test]
    fn deserializes_document_with_only_required_fields() {
        let doc = r#"{
            "issuer": "https://idp.example.com",
            "authorization_endpoint": "https://idp.example.com/oauth/authorize",
            "token_endpoint": "https://idp.example.com/oauth/token",
            "jwks_uri": "https://idp.example.com/keys"
        }"#;
        let meta: ProviderMetadata = serde_json::from_str(doc).unwrap();
        assert!(meta.validate().is_ok());
        assert!(meta.userinfo_endpoint.is_none());
        assert!(meta.scopes_supported.is_none());
    }

    #[test]
    fn absent_endpoint_defaults_to_empty_instead_of_failing() {
        let doc = r#"{"issuer": "https://idp.example.com"}"#;
        let meta: ProviderMetadata = serde_json::from_str(doc).unwrap();
        assert!(meta.authorization_endpoint.is_empty());
        assert!(meta.validate().is_err());
    }

    #[test]
    fn deserializes_advertised_capabilities() {
        let doc = r#"{
            "issuer": "https://idp.example.com",
            "authorization_endpoint": "https://idp.example.com/oauth/authorize",
            "token_endpoint": "https://idp.example.com/oauth/token",
            "jwks_uri": "https://idp.example.com/keys",
            "scopes_supported": ["openid", "email"],
            "code_challenge_methods_supported": ["S256"]
        }"#;
        let meta: ProviderMetadata = serde_json::from_str(doc).unwrap();
        assert_eq!(
            meta.scopes_supported.as_deref(),
            Some(["openid".to_owned(), "email".to_owned()].as_slice())
        );
        assert_eq!(
            meta.code_challenge_methods_supported.as_deref(),
            Some(["S256".to_owned()].as_slice())
        );
    }
}
