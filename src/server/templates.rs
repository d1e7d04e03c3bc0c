// ABOUTME: HTML rendering for the dashboard, error, and waiting pages
// ABOUTME: Fills static templates with escaped claim values and token JSON
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Result page rendering
//!
//! Pages are static HTML shells with `{{KEY}}` placeholders. Every value
//! that originates from the provider response passes through
//! [`escape_html`] before substitution.

use chrono::DateTime;
use serde_json::Value;

use crate::oidc::{IdTokenClaims, TokenSet};
use crate::utils::html::escape_html;

/// Claim keys rendered first, in this order.
const PRIORITY_KEYS: &[&str] = &[
    "sub",
    "email",
    "name",
    "given_name",
    "family_name",
    "iss",
    "aud",
    "iat",
    "exp",
];

/// Claim keys never rendered in the grid.
const SKIP_KEYS: &[&str] = &["picture"];

/// Render the post-login dashboard with the decoded claims and raw tokens.
#[must_use]
pub fn render_dashboard(claims: &IdTokenClaims, tokens: &TokenSet) -> String {
    const TEMPLATE: &str = include_str!("../../templates/dashboard.html");

    let display_name = display_name(claims);
    let avatar = claims.picture.as_deref().map_or_else(
        || escape_html(&initials(display_name)),
        |picture| format!("<img src=\"{}\" alt=\"Avatar\">", escape_html(picture)),
    );
    let email_line = claims
        .email
        .as_deref()
        .map(|email| format!("<p>{}</p>", escape_html(email)))
        .unwrap_or_default();
    let raw_tokens = serde_json::to_string_pretty(tokens).unwrap_or_else(|_| "{}".into());

    TEMPLATE
        .replace("{{AVATAR}}", &avatar)
        .replace("{{DISPLAY_NAME}}", &escape_html(display_name))
        .replace("{{EMAIL_LINE}}", &email_line)
        .replace("{{CLAIMS_GRID}}", &claims_grid(claims))
        .replace("{{RAW_TOKENS}}", &escape_html(&raw_tokens))
}

/// Render the failure page with a summary and optional detail block.
#[must_use]
pub fn render_error(message: &str, details: Option<&str>) -> String {
    const TEMPLATE: &str = include_str!("../../templates/error.html");

    let details_html = details
        .map(|d| format!("<div class=\"error-details\">{}</div>", escape_html(d)))
        .unwrap_or_default();

    TEMPLATE
        .replace("{{MESSAGE}}", &escape_html(message))
        .replace("{{DETAILS}}", &details_html)
}

/// Render the interstitial page shown while authentication is in flight.
#[must_use]
pub fn render_waiting() -> String {
    include_str!("../../templates/waiting.html").into()
}

/// Best available label for the user: name, then email, then subject.
fn display_name(claims: &IdTokenClaims) -> &str {
    claims
        .name
        .as_deref()
        .or(claims.email.as_deref())
        .unwrap_or(&claims.sub)
}

/// Up-to-two-letter monogram for the avatar fallback.
fn initials(name: &str) -> String {
    let mut parts = name
        .split(|c: char| c.is_whitespace() || c == '@')
        .filter(|part| !part.is_empty());
    if let (Some(first), Some(second)) = (parts.next(), parts.next()) {
        if let (Some(a), Some(b)) = (first.chars().next(), second.chars().next()) {
            return format!("{a}{b}").to_uppercase();
        }
    }
    name.chars().take(2).collect::<String>().to_uppercase()
}

/// Claim rows: well-known keys first, everything else after, avatar URL skipped.
fn claims_grid(claims: &IdTokenClaims) -> String {
    let Ok(Value::Object(map)) = serde_json::to_value(claims) else {
        return String::new();
    };

    let mut items = Vec::new();
    for key in PRIORITY_KEYS {
        if let Some(value) = map.get(*key) {
            items.push(claim_item(key, value));
        }
    }
    for (key, value) in &map {
        if !PRIORITY_KEYS.contains(&key.as_str()) && !SKIP_KEYS.contains(&key.as_str()) {
            items.push(claim_item(key, value));
        }
    }
    items.join("\n")
}

fn claim_item(key: &str, value: &Value) -> String {
    format!(
        "<div class=\"claim-item\"><span class=\"claim-key\">{}</span><span class=\"claim-value\">{}</span></div>",
        escape_html(key),
        escape_html(&claim_value(key, value))
    )
}

/// Human-readable form of one claim value.
///
/// Timestamps become UTC date strings, arrays join with commas, objects
/// stay as compact JSON.
fn claim_value(key: &str, value: &Value) -> String {
    if matches!(key, "iat" | "exp") {
        if let Some(rendered) = value
            .as_i64()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        {
            return rendered;
        }
    }

    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
