// ABOUTME: Token exchange client tests against an in-process mock token endpoint
// ABOUTME: Verifies grant encoding, response parsing, and failure diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use oidc_dryrun::errors::AuthFlowError;
use oidc_dryrun::oidc::{exchange_code_for_tokens, CodeExchanger, TokenExchanger};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Form fields the mock token endpoint captured from the last request.
type CapturedForm = Arc<Mutex<Option<HashMap<String, String>>>>;

/// Spawn a mock token endpoint answering with a fixed status and body.
///
/// Returns the endpoint URL and a handle to the captured form fields.
async fn spawn_token_endpoint(status: StatusCode, body: &str) -> (String, CapturedForm) {
    let captured: CapturedForm = Arc::new(Mutex::new(None));
    let body = body.to_owned();

    let handler_captured = captured.clone();
    let app = Router::new().route(
        "/oauth/token",
        post(
            move |State(captured): State<CapturedForm>, Form(fields): Form<HashMap<String, String>>| {
                let body = body.clone();
                async move {
                    *captured.lock().unwrap() = Some(fields);
                    (status, body).into_response()
                }
            },
        ),
    )
    .with_state(handler_captured);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}/oauth/token"), captured)
}

const SUCCESS_BODY: &str = r#"{
    "access_token": "t1",
    "token_type": "Bearer",
    "expires_in": 3600,
    "refresh_token": "rt_1",
    "id_token": "a.b.c",
    "scope": "openid email"
}"#;

#[tokio::test]
async fn exchange_parses_successful_response() {
    let (endpoint, _captured) = spawn_token_endpoint(StatusCode::OK, SUCCESS_BODY).await;

    let tokens = exchange_code_for_tokens(
        &reqwest::Client::new(),
        &endpoint,
        "code_abc",
        "verifier_xyz",
        "http://localhost:12456/auth/callback",
        "client_abc",
    )
    .await
    .unwrap();

    assert_eq!(tokens.access_token, "t1");
    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.expires_in, Some(3600));
    assert_eq!(tokens.refresh_token.as_deref(), Some("rt_1"));
    assert_eq!(tokens.id_token.as_deref(), Some("a.b.c"));
    assert_eq!(tokens.scope.as_deref(), Some("openid email"));
}

#[tokio::test]
async fn exchange_sends_authorization_code_grant_form() {
    let (endpoint, captured) = spawn_token_endpoint(StatusCode::OK, SUCCESS_BODY).await;

    exchange_code_for_tokens(
        &reqwest::Client::new(),
        &endpoint,
        "code_abc",
        "verifier_xyz",
        "http://localhost:12456/auth/callback",
        "client_abc",
    )
    .await
    .unwrap();

    let fields = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        fields.get("grant_type").map(String::as_str),
        Some("authorization_code")
    );
    assert_eq!(fields.get("code").map(String::as_str), Some("code_abc"));
    assert_eq!(
        fields.get("code_verifier").map(String::as_str),
        Some("verifier_xyz")
    );
    assert_eq!(
        fields.get("redirect_uri").map(String::as_str),
        Some("http://localhost:12456/auth/callback")
    );
    assert_eq!(
        fields.get("client_id").map(String::as_str),
        Some("client_abc")
    );
    assert_eq!(fields.len(), 5);
}

#[tokio::test]
async fn exchange_failure_carries_status_and_raw_body() {
    let (endpoint, _captured) =
        spawn_token_endpoint(StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#).await;

    let err = exchange_code_for_tokens(
        &reqwest::Client::new(),
        &endpoint,
        "stale_code",
        "verifier_xyz",
        "http://localhost:12456/auth/callback",
        "client_abc",
    )
    .await
    .unwrap_err();

    match err {
        AuthFlowError::TokenExchange {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 400);
            assert_eq!(status_text, "Bad Request");
            assert_eq!(body, r#"{"error":"invalid_grant"}"#);
        }
        other => panic!("expected TokenExchange, got {other:?}"),
    }
}

#[tokio::test]
async fn exchange_rejects_unparseable_success_body() {
    let (endpoint, _captured) = spawn_token_endpoint(StatusCode::OK, "not json at all").await;

    let err = exchange_code_for_tokens(
        &reqwest::Client::new(),
        &endpoint,
        "code_abc",
        "verifier_xyz",
        "http://localhost:12456/auth/callback",
        "client_abc",
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AuthFlowError::ResponseParse { context: "token", .. }
    ));
}

#[tokio::test]
async fn exchange_reports_unreachable_endpoint_as_network_error() {
    // Bind a listener and drop it so the port is closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = exchange_code_for_tokens(
        &reqwest::Client::new(),
        &format!("http://127.0.0.1:{port}/oauth/token"),
        "code_abc",
        "verifier_xyz",
        "http://localhost:12456/auth/callback",
        "client_abc",
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AuthFlowError::Network {
            operation: "token exchange",
            ..
        }
    ));
}

#[tokio::test]
async fn code_exchanger_binds_grant_material_at_construction() {
    let (endpoint, captured) = spawn_token_endpoint(StatusCode::OK, SUCCESS_BODY).await;

    let exchanger = CodeExchanger::new(
        reqwest::Client::new(),
        endpoint,
        "http://localhost:12456/auth/callback".to_owned(),
        "client_abc".to_owned(),
        "verifier_bound".to_owned(),
    );

    let tokens = exchanger.exchange("code_from_callback").await.unwrap();
    assert_eq!(tokens.access_token, "t1");

    let fields = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        fields.get("code").map(String::as_str),
        Some("code_from_callback")
    );
    assert_eq!(
        fields.get("code_verifier").map(String::as_str),
        Some("verifier_bound")
    );
}
