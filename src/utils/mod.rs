// ABOUTME: Utility modules shared across the authentication flow
// ABOUTME: Contains HTTP client construction and HTML escaping helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// HTML escaping for server-rendered pages
pub mod html;
/// HTTP client configuration and helpers
pub mod http_client;
