// ABOUTME: Main library entry point for the OIDC dryrun diagnostic tool
// ABOUTME: Provides PKCE generation, OIDC discovery, token exchange, and the callback server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

// Crate-level attributes:
// - deny(unsafe_code): nothing in this crate needs unsafe
#![deny(unsafe_code)]

//! # OIDC Dryrun
//!
//! A terminal tool that walks a real OAuth2 Authorization Code + `PKCE`
//! login end to end against a live provider: discover the provider
//! configuration, open the browser on the authorization URL, catch the
//! redirect on a local callback server, exchange the code for tokens, and
//! show the decoded ID token claims in the browser.
//!
//! ## Features
//!
//! - **`OIDC` discovery**: Fetches `/.well-known/openid-configuration`
//! - **`PKCE` S256**: Fresh verifier, challenge, and `CSRF` state per run
//! - **Local callback server**: Fixed port, validates state, exchanges the code
//! - **Claims dashboard**: Renders the decoded ID token without verifying it
//! - **`SSO` and `FSA` modes**: Optional organization routing for `SSO` logins
//!
//! ## Quick Start
//!
//! ```text
//! oidc-dryrun --env_url auth.example.com --client_id skc_1234
//! ```
//!
//! The tool prints each step as it runs and leaves the callback server up
//! until Ctrl+C so the result pages stay available.
//!
//! ## Architecture
//!
//! - **`pkce`**: Verifier, challenge, and state generation
//! - **`oidc`**: Discovery document fetch and token endpoint client
//! - **`authorize`**: Authorization URL construction
//! - **`server`**: Axum callback server, session state, and result pages
//! - **`browser`**: System browser launching with a printed fallback
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use oidc_dryrun::authorize::{AuthMode, AuthorizationRequest};
//! use oidc_dryrun::constants::{redirect_uri, CALLBACK_PORT, DEFAULT_SCOPES};
//! use oidc_dryrun::pkce::{generate_state, PkceParams};
//!
//! fn main() -> anyhow::Result<()> {
//!     let pkce = PkceParams::generate();
//!     let request = AuthorizationRequest {
//!         authorization_endpoint: "https://idp.example.com/oauth2/authorize".into(),
//!         client_id: "client_abc".into(),
//!         redirect_uri: redirect_uri(CALLBACK_PORT),
//!         scopes: DEFAULT_SCOPES.into(),
//!         code_challenge: pkce.code_challenge.clone(),
//!         state: generate_state(),
//!         mode: AuthMode::Fsa,
//!         organization_id: None,
//!     };
//!     println!("{}", request.build_url()?);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the binary crate (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access them.

/// Authorization URL construction for the code + `PKCE` flow
pub mod authorize;

/// System browser launching with printed fallback
pub mod browser;

/// Flow-wide constants: callback port, paths, and scopes
pub mod constants;

/// Error types for every stage of the flow
pub mod errors;

/// Logging configuration and structured logging setup
pub mod logging;

/// `OIDC` discovery and token endpoint client
pub mod oidc;

/// `PKCE` verifier, challenge, and `CSRF` state generation
pub mod pkce;

/// Local callback server, session state, and result pages
pub mod server;

/// Shared utilities: HTTP clients and HTML escaping
pub mod utils;
