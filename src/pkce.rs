// ABOUTME: PKCE parameter generation for the authorization code flow
// ABOUTME: Produces the code verifier, S256 challenge, and anti-CSRF state token
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! `PKCE` (Proof Key for Code Exchange) material
//!
//! All random values come from the thread-local CSPRNG. The verifier and the
//! state token are independent: one proves possession during the token
//! exchange, the other ties the callback to this process run.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::constants::{PKCE_VERIFIER_BYTES, STATE_TOKEN_BYTES};

/// `PKCE` parameters for one authorization attempt
#[derive(Debug, Clone)]
pub struct PkceParams {
    /// Randomly generated code verifier, base64url without padding
    pub code_verifier: String,
    /// SHA-256 hash of the verifier, base64url without padding
    pub code_challenge: String,
    /// Challenge method (always "S256")
    pub code_challenge_method: String,
}

impl PkceParams {
    /// Generate fresh `PKCE` parameters with the `S256` challenge method
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; PKCE_VERIFIER_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let code_verifier = URL_SAFE_NO_PAD.encode(bytes);
        let code_challenge = challenge_for(&code_verifier);

        Self {
            code_verifier,
            code_challenge,
            code_challenge_method: "S256".into(),
        }
    }
}

/// Derive the `S256` code challenge for a verifier.
///
/// Deterministic: the provider recomputes this from the verifier submitted
/// during the token exchange.
#[must_use]
pub fn challenge_for(code_verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code_verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Generate the anti-CSRF state token as lowercase hex.
#[must_use]
pub fn generate_state() -> String {
    let mut bytes = [0_u8; STATE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
