// ABOUTME: Fixed protocol surface shared by the CLI and the callback server
// ABOUTME: Callback port, redirect path, requested scopes, and PKCE sizing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Application constants
//!
//! The redirect URI is part of the client registration at the identity
//! provider, so the port and callback path are fixed rather than configurable.

/// Port the local callback server listens on. The redirect URI registered
/// with the provider must point at this port.
pub const CALLBACK_PORT: u16 = 12456;

/// Path the provider redirects back to after authentication.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Scopes requested on every authorization attempt.
pub const DEFAULT_SCOPES: &str = "openid email profile offline_access";

/// Well-known path for `OIDC` provider metadata.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

/// Random bytes behind the `PKCE` code verifier (encodes to 43 characters).
pub const PKCE_VERIFIER_BYTES: usize = 32;

/// Random bytes behind the anti-CSRF state token (encodes to 32 hex characters).
pub const STATE_TOKEN_BYTES: usize = 16;

/// Redirect URI for the given callback port.
#[must_use]
pub fn redirect_uri(port: u16) -> String {
    format!("http://localhost:{port}{CALLBACK_PATH}")
}
