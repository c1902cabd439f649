//! Aikagi - a minimal session-authenticated web app with Google sign-in
//!
//! Three server-rendered pages (home, login, profile) branch on the
//! presence of an authenticated session. Sessions are stateless:
//! everything lives in an HMAC-signed cookie, there is no server-side
//! session store. The OAuth protocol itself is delegated to the
//! `oauth2` crate and Google.
//!
//! # Modules
//!
//! - `auth`: Google OAuth flow, session tokens, session retrieval
//! - `pages`: server-rendered pages and view functions
//! - `config`: configuration management
//! - `error`: error types

pub mod auth;
pub mod config;
pub mod error;
pub mod pages;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Cloned for each request. Every request is an independent unit of
/// work; nothing here is mutable.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// HTTP client for the token exchange and userinfo calls
    pub http_client: Arc<reqwest::Client>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        // The oauth2 crate expects a client that does not follow
        // redirects when it performs the code exchange.
        let http_client = reqwest::Client::builder()
            .user_agent("Aikagi/0.1.0")
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        Ok(Self {
            config: Arc::new(config),
            http_client: Arc::new(http_client),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(pages::pages_router())
        .merge(auth::auth_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
