// ABOUTME: System browser launching for the front-channel authorization step
// ABOUTME: Falls back to printing the URL when no browser can be opened
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Browser launching
//!
//! Headless environments have no browser to open. The launcher is a trait so
//! that failure handling is testable, and a failed launch degrades to
//! printing the URL for the user to open by hand.

use tracing::warn;

/// Opens URLs in the user's browser.
pub trait BrowserLauncher {
    /// Open `url` in a browser.
    ///
    /// # Errors
    ///
    /// Returns an error when no browser could be launched.
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Launcher backed by the operating system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        webbrowser::open(url)
    }
}

/// Open `url` via `launcher`, printing it as a fallback on failure.
pub fn launch_or_print(launcher: &dyn BrowserLauncher, url: &str) {
    if let Err(e) = launcher.open(url) {
        warn!("Failed to open browser: {e}");
        println!("Could not open a browser automatically.");
        println!("Open this URL to continue:");
        println!("  {url}");
    }
}
