// ABOUTME: CLI entry point driving the full authorization code + PKCE dry run
// ABOUTME: Discovers the provider, opens the browser, and serves the callback
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # OIDC Dryrun Binary
//!
//! Walks a live OAuth2/OIDC login end to end: discovery, `PKCE`,
//! authorization redirect, local callback, token exchange, and a claims
//! dashboard in the browser.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use oidc_dryrun::{
    authorize::{AuthMode, AuthorizationRequest},
    browser::{launch_or_print, SystemBrowser},
    constants::{redirect_uri, CALLBACK_PORT, DEFAULT_SCOPES},
    logging,
    oidc::{discover_configuration, CodeExchanger},
    pkce::{generate_state, PkceParams},
    server::{BoundServer, CallbackServerConfig, ServerState},
    utils::http_client::{oauth_client, shared_client},
};
use std::sync::Arc;

const EXAMPLES_HELP: &str = "Examples:
  # Full-stack authentication (default mode)
  oidc-dryrun --env_url auth.example.com --client_id skc_xxx

  # Enterprise SSO for a specific organization
  oidc-dryrun --env_url auth.example.com --client_id skc_xxx --mode sso --organization_id org_xxx";

#[derive(Parser)]
#[command(name = "oidc-dryrun")]
#[command(about = "Test OAuth2/OIDC authentication flows without writing code")]
#[command(after_help = EXAMPLES_HELP)]
pub struct Args {
    /// Authorization server host (e.g., auth.example.com)
    #[arg(long = "env_url")]
    env_url: String,

    /// OAuth client ID registered with the provider
    #[arg(long = "client_id")]
    client_id: String,

    /// Authentication mode: 'sso' for enterprise SSO, 'fsa' for full-stack auth
    #[arg(long, value_enum, default_value_t = AuthMode::Fsa)]
    mode: AuthMode,

    /// Organization to authenticate against, required for SSO mode
    #[arg(long = "organization_id")]
    organization_id: Option<String>,
}

fn print_banner() {
    println!();
    println!("  ╔═══════════════════════════════════════════════════════════╗");
    println!("  ║                        OIDC Dryrun                        ║");
    println!("  ║               Test authentication without code            ║");
    println!("  ╚═══════════════════════════════════════════════════════════╝");
    println!();
}

/// Parse and validate arguments, exiting with code 1 on invalid input.
fn parse_args() -> Args {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let is_help = matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
            let _ = e.print();
            std::process::exit(i32::from(!is_help));
        }
    };

    if matches!(args.mode, AuthMode::Sso) && args.organization_id.is_none() {
        eprintln!("Error: --organization_id is required when mode is \"sso\"");
        std::process::exit(1);
    }

    args
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    let args = parse_args();

    logging::init_from_env()?;

    let redirect_uri = redirect_uri(CALLBACK_PORT);

    println!("Configuration:");
    println!("  Environment URL: {}", args.env_url);
    println!("  Client ID: {}", args.client_id);
    println!("  Mode: {}", args.mode);
    if let Some(organization_id) = &args.organization_id {
        println!("  Organization ID: {organization_id}");
    }
    println!("  Redirect URI: {redirect_uri}");
    println!();

    println!("Step 1: Discovering OIDC configuration...");
    let metadata = discover_configuration(&args.env_url, shared_client()).await?;
    println!(
        "  Authorization endpoint: {}",
        metadata.authorization_endpoint
    );
    println!("  Token endpoint: {}", metadata.token_endpoint);
    println!();

    println!("Step 2: Generating PKCE parameters...");
    let pkce = PkceParams::generate();
    let state = generate_state();
    println!("  Code verifier and challenge generated");
    println!();

    println!("Step 3: Building authorization URL...");
    let request = AuthorizationRequest {
        authorization_endpoint: metadata.authorization_endpoint,
        client_id: args.client_id.clone(),
        redirect_uri: redirect_uri.clone(),
        scopes: DEFAULT_SCOPES.into(),
        code_challenge: pkce.code_challenge,
        state: state.clone(),
        mode: args.mode,
        organization_id: args.organization_id,
    };
    let authorization_url = request.build_url()?;
    println!();

    println!("Step 4: Starting local server...");
    let exchanger = Arc::new(CodeExchanger::new(
        oauth_client(),
        metadata.token_endpoint,
        redirect_uri,
        args.client_id,
        pkce.code_verifier,
    ));
    let config = CallbackServerConfig {
        port: CALLBACK_PORT,
        expected_state: state,
        authorization_url: authorization_url.clone(),
    };
    let server = BoundServer::bind(Arc::new(ServerState::new(config, exchanger))).await?;
    println!("  Server running at http://localhost:{CALLBACK_PORT}");
    println!();

    println!("Step 5: Opening browser for authentication...");
    launch_or_print(&SystemBrowser, &authorization_url);
    println!();
    println!("Waiting for authentication...");
    println!("(Press Ctrl+C to cancel)");
    println!();

    server.serve().await
}
