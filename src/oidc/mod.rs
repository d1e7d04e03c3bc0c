// ABOUTME: OIDC protocol module organizing discovery and token operations
// ABOUTME: Centralizes provider metadata, token exchange, and claim decoding
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # `OIDC` Protocol Module
//!
//! The two outbound legs of the flow: fetching provider metadata from the
//! well-known endpoint, and exchanging the authorization code for tokens.
//! ID token decoding lives here too since the claims come out of the token
//! response.

pub mod discovery;
pub mod tokens;

pub use discovery::{discover_configuration, fetch_metadata, ProviderMetadata};
pub use tokens::{
    decode_id_token, exchange_code_for_tokens, Audience, CodeExchanger, IdTokenClaims,
    TokenExchanger, TokenSet,
};
