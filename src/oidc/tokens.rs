// ABOUTME: Token exchange client and ID token payload decoding
// ABOUTME: Posts the authorization code grant and parses the unverified claims
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Token exchange and ID token decoding
//!
//! The exchange is a single form-encoded POST carrying the `PKCE` verifier.
//! The ID token payload is decoded without signature verification: this tool
//! diagnoses flow wiring, it does not authenticate anyone. The signature
//! segment is required to exist but is never checked.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AuthFlowError, AuthResult};

/// Token endpoint response, kept verbatim.
///
/// The access token is treated as an opaque string; only `id_token` is
/// interpreted further.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// The access token issued by the authorization server
    pub access_token: String,
    /// The type of token (usually "Bearer")
    #[serde(default)]
    pub token_type: String,
    /// Token lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Refresh token, when the provider grants one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Signed ID token carrying the identity claims
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Space-separated list of granted scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// `aud` claim: a single audience or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience string
    Single(String),
    /// Multiple audiences
    Multiple(Vec<String>),
}

/// Claims decoded from the ID token payload.
///
/// Claims beyond the well-known set are preserved in `extra` so the
/// dashboard can show everything the provider sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Issuer identifier
    pub iss: String,
    /// Subject identifier
    pub sub: String,
    /// Intended audience(s)
    pub aud: Audience,
    /// Expiration time, seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at time, seconds since the Unix epoch
    pub iat: i64,
    /// User email, when granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name, when granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Given name, when granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name, when granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Avatar URL, when granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Any remaining claims, preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Exchange an authorization code for tokens.
///
/// Sends the `authorization_code` grant as a form-encoded POST with the
/// `PKCE` verifier. A non-success status is an error carrying the raw
/// response body for diagnosis.
///
/// # Errors
///
/// Returns [`AuthFlowError::TokenExchange`] for non-success responses,
/// [`AuthFlowError::ResponseParse`] when a success body is not valid token
/// JSON, and a transport error when the request itself fails.
pub async fn exchange_code_for_tokens(
    client: &Client,
    token_endpoint: &str,
    code: &str,
    code_verifier: &str,
    redirect_uri: &str,
    client_id: &str,
) -> AuthResult<TokenSet> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("client_id", client_id),
        ("code_verifier", code_verifier),
    ];

    let response = client
        .post(token_endpoint)
        .form(&params)
        .send()
        .await
        .map_err(|e| AuthFlowError::transport("token exchange", e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthFlowError::TokenExchange {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| AuthFlowError::transport("token exchange", e))?;
    serde_json::from_str(&body).map_err(|source| AuthFlowError::ResponseParse {
        context: "token",
        source,
    })
}

/// Decode the claims from an ID token without verifying its signature.
///
/// # Errors
///
/// Returns [`AuthFlowError::MalformedToken`] when the token does not have
/// exactly three segments, the payload is not base64url, or the payload is
/// not a valid claims document.
pub fn decode_id_token(id_token: &str) -> AuthResult<IdTokenClaims> {
    let mut segments = id_token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthFlowError::MalformedToken(
            "expected three dot-separated segments".into(),
        ));
    };

    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthFlowError::MalformedToken(format!("payload is not base64url: {e}")))?;
    serde_json::from_slice(&decoded)
        .map_err(|e| AuthFlowError::MalformedToken(format!("payload is not valid claims JSON: {e}")))
}

/// Seam for the callback handler's code exchange.
///
/// The production implementation posts to the real token endpoint; tests
/// substitute their own so exchange invocations are observable.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange an authorization code for a token set.
    ///
    /// # Errors
    ///
    /// Returns an error when the exchange request fails or the response
    /// cannot be parsed.
    async fn exchange(&self, code: &str) -> AuthResult<TokenSet>;
}

/// [`TokenExchanger`] bound to one provider and one `PKCE` grant.
pub struct CodeExchanger {
    client: Client,
    token_endpoint: String,
    redirect_uri: String,
    client_id: String,
    code_verifier: String,
}

impl CodeExchanger {
    /// Create an exchanger for the given token endpoint and grant material.
    #[must_use]
    pub const fn new(
        client: Client,
        token_endpoint: String,
        redirect_uri: String,
        client_id: String,
        code_verifier: String,
    ) -> Self {
        Self {
            client,
            token_endpoint,
            redirect_uri,
            client_id,
            code_verifier,
        }
    }
}

#[async_trait]
impl TokenExchanger for CodeExchanger {
    async fn exchange(&self, code: &str) -> AuthResult<TokenSet> {
        exchange_code_for_tokens(
            &self.client,
            &self.token_endpoint,
            code,
            &self.code_verifier,
            &self.redirect_uri,
            &self.client_id,
        )
        .await
    }
}
