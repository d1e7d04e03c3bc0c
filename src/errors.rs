// ABOUTME: Error taxonomy for the OIDC dry-run flow
// ABOUTME: Distinguishes discovery, CSRF, exchange, and token decoding failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Error Handling
//!
//! One domain error type covers the whole authorization flow. Startup errors
//! (discovery, URL construction, port binding) abort the process; errors
//! raised while handling the provider callback are converted into a
//! [`CallbackFailure`] and stored in the session so the result pages can
//! render them. Timeouts are kept separate from other transport failures so
//! a hung provider is diagnosable at a glance.

use thiserror::Error;

/// Result alias for flow operations.
pub type AuthResult<T> = Result<T, AuthFlowError>;

/// Errors raised while driving the authorization code + `PKCE` flow.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    /// Provider metadata endpoint answered with a non-success status.
    #[error("Failed to fetch OIDC configuration: {status} {status_text}")]
    DiscoveryHttp {
        /// HTTP status code returned by the well-known endpoint.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// Provider metadata parsed but lacks a required endpoint.
    #[error("Invalid OIDC configuration: missing {field}")]
    DiscoveryInvalidConfig {
        /// Name of the absent or empty metadata field.
        field: &'static str,
    },

    /// Callback `state` parameter does not match the value sent with the
    /// authorization request.
    #[error("State parameter mismatch")]
    CsrfStateMismatch,

    /// Callback carried neither an error nor an authorization code.
    #[error("No authorization code received")]
    MissingAuthorizationCode,

    /// Provider redirected back with an explicit authorization error.
    #[error("Authorization error: {error}")]
    ProviderAuthorization {
        /// Error code from the `error` callback parameter.
        error: String,
        /// Optional `error_description` callback parameter.
        description: Option<String>,
    },

    /// Token endpoint answered with a non-success status.
    #[error("Token exchange failed: {status} {status_text} - {body}")]
    TokenExchange {
        /// HTTP status code returned by the token endpoint.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
        /// Raw response body, preserved verbatim for diagnosis.
        body: String,
    },

    /// ID token could not be split or decoded into claims.
    #[error("Invalid ID token format: {0}")]
    MalformedToken(String),

    /// Response body was not the JSON document the flow expected.
    #[error("Failed to parse {context} response: {source}")]
    ResponseParse {
        /// Which request produced the unparseable body.
        context: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Request exceeded the configured client timeout.
    #[error("Request timed out during {operation}")]
    RequestTimeout {
        /// Which request timed out.
        operation: &'static str,
    },

    /// Transport-level failure other than a timeout.
    #[error("Network error during {operation}: {source}")]
    Network {
        /// Which request failed.
        operation: &'static str,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
}

impl AuthFlowError {
    /// Classify a transport error, keeping timeouts distinguishable from
    /// other network failures.
    #[must_use]
    pub fn transport(operation: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::RequestTimeout { operation }
        } else {
            Self::Network { operation, source }
        }
    }
}

/// A callback-time failure reduced to what the error page renders.
///
/// `summary` is the headline; `details` carries the diagnostic text. Both are
/// stored in the session verbatim and escaped only at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    /// Short human-readable summary.
    pub summary: String,
    /// Optional diagnostic detail.
    pub details: Option<String>,
}

impl From<AuthFlowError> for CallbackFailure {
    fn from(err: AuthFlowError) -> Self {
        match err {
            // The provider's own error code and description pass through
            // unchanged.
            AuthFlowError::ProviderAuthorization { error, description } => Self {
                summary: error,
                details: description,
            },
            AuthFlowError::CsrfStateMismatch => Self {
                summary: "State mismatch".into(),
                details: Some(
                    "The state parameter does not match. This could indicate a CSRF attack."
                        .into(),
                ),
            },
            AuthFlowError::MissingAuthorizationCode => Self {
                summary: "No authorization code".into(),
                details: Some("The authorization server did not return a code.".into()),
            },
            // Exchange, decoding, and transport failures all surface under
            // the exchange headline with the specific error as detail.
            other => Self {
                summary: "Token exchange failed".into(),
                details: Some(other.to_string()),
            },
        }
    }
}
