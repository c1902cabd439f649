//! Server-rendered pages
//!
//! Each handler resolves the current session once via [`MaybeUser`]
//! and passes it explicitly into the view functions; there is no
//! ambient session state.
//!
//! [`MaybeUser`]: crate::auth::MaybeUser

mod home;
mod login;
mod profile;
pub mod views;

use axum::{Router, routing::get};

use crate::AppState;

/// Create the page router
///
/// Routes:
/// - GET / - Home (public)
/// - GET /login - Login page (public, bounces authenticated visitors)
/// - GET /profile - Profile (requires a session)
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home_page))
        .route("/login", get(login::login_page))
        .route("/profile", get(profile::profile_page))
}
