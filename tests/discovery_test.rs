// ABOUTME: OIDC discovery client tests against a mock well-known endpoint
// ABOUTME: Covers status mapping, metadata validation, and malformed documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use oidc_dryrun::errors::AuthFlowError;
use oidc_dryrun::oidc::fetch_metadata;

/// Spawn a mock provider serving a fixed well-known configuration response.
async fn spawn_well_known(status: StatusCode, body: &str) -> String {
    let body = body.to_owned();
    let app = Router::new().route(
        "/.well-known/openid-configuration",
        get(move || async move { (status, body).into_response() }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{port}/.well-known/openid-configuration")
}

#[tokio::test]
async fn fetches_complete_configuration() {
    let url = spawn_well_known(
        StatusCode::OK,
        r#"{
            "issuer": "https://idp.example.com",
            "authorization_endpoint": "https://idp/authorize",
            "token_endpoint": "https://idp/token",
            "jwks_uri": "https://idp/keys",
            "scopes_supported": ["openid", "email", "profile"],
            "code_challenge_methods_supported": ["S256"]
        }"#,
    )
    .await;

    let metadata = fetch_metadata(&url, &reqwest::Client::new()).await.unwrap();
    assert_eq!(metadata.issuer, "https://idp.example.com");
    assert_eq!(metadata.authorization_endpoint, "https://idp/authorize");
    assert_eq!(metadata.token_endpoint, "https://idp/token");
    assert_eq!(metadata.jwks_uri, "https://idp/keys");
    assert_eq!(
        metadata.code_challenge_methods_supported.as_deref(),
        Some(["S256".to_owned()].as_slice())
    );
}

#[tokio::test]
async fn non_success_status_maps_to_discovery_http_error() {
    let url = spawn_well_known(StatusCode::NOT_FOUND, "not here").await;

    let err = fetch_metadata(&url, &reqwest::Client::new())
        .await
        .unwrap_err();

    match err {
        AuthFlowError::DiscoveryHttp {
            status,
            status_text,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("expected DiscoveryHttp, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_token_endpoint_is_an_invalid_configuration() {
    let url = spawn_well_known(
        StatusCode::OK,
        r#"{
            "issuer": "https://idp.example.com",
            "authorization_endpoint": "https://idp/authorize",
            "jwks_uri": "https://idp/keys"
        }"#,
    )
    .await;

    let err = fetch_metadata(&url, &reqwest::Client::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthFlowError::DiscoveryInvalidConfig {
            field: "token_endpoint"
        }
    ));
}

#[tokio::test]
async fn missing_authorization_endpoint_is_an_invalid_configuration() {
    let url = spawn_well_known(
        StatusCode::OK,
        r#"{
            "issuer": "https://idp.example.com",
            "token_endpoint": "https://idp/token",
            "jwks_uri": "https://idp/keys"
        }"#,
    )
    .await;

    let err = fetch_metadata(&url, &reqwest::Client::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthFlowError::DiscoveryInvalidConfig {
            field: "authorization_endpoint"
        }
    ));
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let url = spawn_well_known(StatusCode::OK, "<html>maintenance page</html>").await;

    let err = fetch_metadata(&url, &reqwest::Client::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthFlowError::ResponseParse {
            context: "OIDC discovery",
            ..
        }
    ));
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = fetch_metadata(
        &format!("http://127.0.0.1:{port}/.well-known/openid-configuration"),
        &reqwest::Client::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AuthFlowError::Network {
            operation: "OIDC discovery",
            ..
        }
    ));
}
