// ABOUTME: Local HTTP server receiving the OAuth2 redirect and serving result pages
// ABOUTME: Validates state, exchanges the code, and renders dashboard or error
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Callback server
//!
//! A short-lived local server that stands in for a real application's
//! redirect endpoint. `/` starts the flow by redirecting to the provider,
//! `/auth/callback` receives the result, `/dashboard` and `/error` render
//! it. All pages are driven by a single [`Session`] record guarded by an
//! async lock; the callback handler is its only writer.

/// Callback session state
pub mod session;
/// Result page rendering
pub mod templates;

pub use session::{CallbackOutcome, Session, SessionPhase};

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header::LOCATION, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

use crate::constants::CALLBACK_PATH;
use crate::errors::AuthFlowError;
use crate::oidc::{decode_id_token, TokenExchanger};

/// Settings the callback server needs for one flow run.
#[derive(Debug, Clone)]
pub struct CallbackServerConfig {
    /// Port to listen on
    pub port: u16,
    /// State token the callback must echo back
    pub expected_state: String,
    /// Authorization URL that `/` redirects to
    pub authorization_url: String,
}

/// Shared state behind the callback routes.
pub struct ServerState {
    config: CallbackServerConfig,
    exchanger: Arc<dyn TokenExchanger>,
    session: RwLock<Session>,
}

impl ServerState {
    /// Create server state with an empty session.
    #[must_use]
    pub fn new(config: CallbackServerConfig, exchanger: Arc<dyn TokenExchanger>) -> Self {
        Self {
            config,
            exchanger,
            session: RwLock::new(Session::new()),
        }
    }
}

/// Query parameters the provider may send to the callback.
#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// HTTP routes for the local callback server.
pub struct CallbackRoutes;

impl CallbackRoutes {
    /// Build the router with all flow pages and middleware.
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route("/", get(index))
            .route(CALLBACK_PATH, get(callback))
            .route("/dashboard", get(dashboard))
            .route("/error", get(error_page))
            .route("/waiting", get(waiting))
            .fallback(not_found)
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .with_state(state)
    }
}

/// 302 redirect. Browsers follow it with a GET, which is what the flow needs.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

async fn index(State(state): State<Arc<ServerState>>) -> Response {
    found(&state.config.authorization_url)
}

async fn callback(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let outcome = evaluate_callback(&state, params).await;
    let destination = if outcome.is_ok() { "/dashboard" } else { "/error" };
    state.session.write().await.apply(outcome);
    found(destination)
}

async fn dashboard(State(state): State<Arc<ServerState>>) -> Response {
    let session = state.session.read().await;
    match (session.tokens(), session.claims()) {
        (Some(tokens), Some(claims)) => {
            Html(templates::render_dashboard(claims, tokens)).into_response()
        }
        _ => found("/"),
    }
}

async fn error_page(State(state): State<Arc<ServerState>>) -> Response {
    let session = state.session.read().await;
    Html(templates::render_error(
        session.error().unwrap_or("Unknown error"),
        session.error_details(),
    ))
    .into_response()
}

#[allow(clippy::unused_async)]
async fn waiting() -> Response {
    Html(templates::render_waiting()).into_response()
}

#[allow(clippy::unused_async)]
async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Run the callback checks in order: provider error, state, code, exchange.
///
/// The checks mirror what the redirect can carry. A provider error wins over
/// everything, a state mismatch is rejected before the code is even looked
/// at, and the exchange only runs for a well-formed callback.
async fn evaluate_callback(state: &ServerState, params: CallbackParams) -> CallbackOutcome {
    if let Some(error) = params.error {
        error!(
            "Authorization error: {error} - {}",
            params.error_description.as_deref().unwrap_or("")
        );
        return Err(AuthFlowError::ProviderAuthorization {
            error,
            description: params.error_description.filter(|d| !d.is_empty()),
        }
        .into());
    }

    if params.state.as_deref() != Some(state.config.expected_state.as_str()) {
        error!("State mismatch - possible CSRF attack");
        return Err(AuthFlowError::CsrfStateMismatch.into());
    }

    let Some(code) = params.code else {
        error!("No authorization code received");
        return Err(AuthFlowError::MissingAuthorizationCode.into());
    };

    info!("Exchanging authorization code for tokens...");
    let tokens = match state.exchanger.exchange(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("Token exchange failed: {e}");
            return Err(e.into());
        }
    };
    info!("Token exchange successful!");

    let claims = match tokens.id_token.as_deref() {
        Some(id_token) => match decode_id_token(id_token) {
            Ok(claims) => {
                info!("ID token decoded successfully");
                info!("User: {}", claims.email.as_deref().unwrap_or(&claims.sub));
                Some(claims)
            }
            Err(e) => {
                error!("Failed to decode ID token: {e}");
                return Err(e.into());
            }
        },
        None => None,
    };

    Ok((tokens, claims))
}

/// Convert a handler panic into the generic 500 page.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err.downcast_ref::<String>().map_or_else(
        || err.downcast_ref::<&str>().map_or("unexpected panic", |s| *s),
        String::as_str,
    );
    error!("Request handler panicked: {detail}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(templates::render_error("Internal server error", Some(detail))),
    )
        .into_response()
}

/// A callback server bound to its port and ready to serve.
///
/// Binding is separate from serving so the caller can fail fast on a busy
/// port and open the browser only once the listener is live.
pub struct BoundServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl BoundServer {
    /// Bind the listener on the configured port.
    ///
    /// # Errors
    ///
    /// Returns an error when the port is already in use or cannot be bound.
    pub async fn bind(state: Arc<ServerState>) -> Result<Self> {
        let port = state.config.port;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("Failed to bind callback server on port {port}"))?;
        Ok(Self { listener, state })
    }

    /// Address the server is listening on.
    ///
    /// # Errors
    ///
    /// Returns an error when the local address cannot be read from the socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read local address")
    }

    /// Serve requests until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns an error when the server fails while accepting connections.
    pub async fn serve(self) -> Result<()> {
        let app = CallbackRoutes::routes(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Callback server failed")
    }
}

/// Resolve when Ctrl+C arrives.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => println!("\nShutting down..."),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
