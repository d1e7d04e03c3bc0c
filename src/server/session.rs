// ABOUTME: Authentication session state captured from the OAuth2 callback
// ABOUTME: Holds the outcome a single flow run renders on the result pages
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Callback session state
//!
//! One record per server run. The callback handler is the only writer; a
//! repeated callback replaces the whole record, so the pages always reflect
//! the most recent attempt and never mix fields from two attempts.

use crate::errors::CallbackFailure;
use crate::oidc::{IdTokenClaims, TokenSet};

/// Result of processing one callback request.
pub type CallbackOutcome = Result<(TokenSet, Option<IdTokenClaims>), CallbackFailure>;

/// Where the flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No callback has completed yet
    Pending,
    /// Tokens and identity claims are available
    Authenticated,
    /// The most recent callback failed
    Failed,
}

/// Outcome of the most recent callback, if any.
#[derive(Debug, Default)]
pub struct Session {
    tokens: Option<TokenSet>,
    claims: Option<IdTokenClaims>,
    error: Option<String>,
    error_details: Option<String>,
}

impl Session {
    /// Create an empty session awaiting its first callback.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tokens: None,
            claims: None,
            error: None,
            error_details: None,
        }
    }

    /// Record a callback outcome, replacing whatever was stored before.
    pub fn apply(&mut self, outcome: CallbackOutcome) {
        match outcome {
            Ok((tokens, claims)) => {
                self.tokens = Some(tokens);
                self.claims = claims;
                self.error = None;
                self.error_details = None;
            }
            Err(failure) => {
                self.tokens = None;
                self.claims = None;
                self.error = Some(failure.summary);
                self.error_details = failure.details;
            }
        }
    }

    /// Current phase of the flow.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        if self.error.is_some() {
            SessionPhase::Failed
        } else if self.tokens.is_some() && self.claims.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Pending
        }
    }

    /// Tokens from the most recent successful callback.
    #[must_use]
    pub const fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// Decoded claims from the most recent successful callback.
    #[must_use]
    pub const fn claims(&self) -> Option<&IdTokenClaims> {
        self.claims.as_ref()
    }

    /// Error summary from the most recent failed callback.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Error details from the most recent failed callback.
    #[must_use]
    pub fn error_details(&self) -> Option<&str> {
        self.error_details.as_deref()
    }
}
