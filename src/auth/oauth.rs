//! Google OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow (with PKCE) against
//! Google. The protocol work itself is delegated to the `oauth2` crate;
//! this module only keeps the CSRF state and PKCE verifier in transient
//! cookies between the redirect and the callback.

use axum::{
    Router,
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

use super::session::{SESSION_COOKIE, SessionToken, SessionUser, create_session_token};
use crate::AppState;
use crate::config::AppConfig;
use crate::error::AppError;

/// Cookie holding the CSRF state between redirect and callback
const STATE_COOKIE: &str = "oauth_state";
/// Cookie holding the PKCE verifier between redirect and callback
const PKCE_COOKIE: &str = "oauth_pkce";
/// Lifetime of the transient OAuth cookies
const OAUTH_COOKIE_MAX_AGE_SECS: i64 = 600;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

type GoogleClient = oauth2::basic::BasicClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Create authentication router
///
/// Routes:
/// - GET /auth/google - Redirect to Google
/// - GET /auth/google/callback - OAuth callback
/// - POST /logout - Logout
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/google", get(google_redirect))
        .route("/auth/google/callback", get(google_callback))
        .route("/logout", post(logout))
}

/// Build the `oauth2` client for Google from configuration
fn create_oauth_client(config: &AppConfig) -> Result<GoogleClient, AppError> {
    let redirect_uri = format!("{}/auth/google/callback", config.server.base_url());

    let client = oauth2::basic::BasicClient::new(ClientId::new(
        config.auth.google.client_id.clone(),
    ))
    .set_client_secret(ClientSecret::new(config.auth.google.client_secret.clone()))
    .set_auth_uri(
        AuthUrl::new(GOOGLE_AUTH_URL.to_string()).map_err(|e| AppError::Config(e.to_string()))?,
    )
    .set_token_uri(
        TokenUrl::new(GOOGLE_TOKEN_URL.to_string()).map_err(|e| AppError::Config(e.to_string()))?,
    )
    .set_redirect_uri(
        RedirectUrl::new(redirect_uri).map_err(|e| AppError::Config(e.to_string()))?,
    );

    Ok(client)
}

// =============================================================================
// Google OAuth
// =============================================================================

/// GET /auth/google
///
/// Redirects the user to Google's authorization page.
///
/// # Steps
/// 1. Generate CSRF state token and PKCE challenge
/// 2. Store state and verifier in transient cookies
/// 3. Redirect to Google with client_id, redirect_uri, scope, state
async fn google_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let client = create_oauth_client(&state.config)?;

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (auth_url, csrf_token) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    let secure = state.config.should_use_secure_cookies();
    let jar = jar
        .add(transient_cookie(
            STATE_COOKIE,
            csrf_token.secret().clone(),
            secure,
        ))
        .add(transient_cookie(
            PKCE_COOKIE,
            pkce_verifier.secret().clone(),
            secure,
        ));

    tracing::debug!("Redirecting to Google authorization endpoint");
    Ok((jar, Redirect::to(auth_url.as_str())))
}

/// Query parameters from the Google callback
#[derive(Debug, Deserialize)]
struct GoogleCallbackQuery {
    /// Authorization code
    code: Option<String>,
    /// CSRF state token
    state: Option<String>,
    /// Error code when the user denied the request
    error: Option<String>,
}

/// User info from Google's userinfo endpoint
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: String,
    verified_email: Option<bool>,
    name: Option<String>,
    picture: Option<String>,
}

/// GET /auth/google/callback
///
/// Handles the OAuth callback from Google.
///
/// # Steps
/// 1. Verify CSRF state against the state cookie
/// 2. Exchange code for access token (PKCE verifier from cookie)
/// 3. Fetch user info from Google
/// 4. Issue and sign a session token, set the session cookie
/// 5. Redirect to home
///
/// A callback without the transient cookies is rejected with 401; a
/// failed or denied exchange redirects back to the login page with a
/// visible error.
async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(error) = &query.error {
        tracing::warn!(%error, "Google returned an authorization error");
        return Ok((clear_transient_cookies(jar), Redirect::to("/login?error=auth")));
    }

    // CSRF check: the callback must carry the state we set at redirect time.
    let state_cookie = jar.get(STATE_COOKIE).ok_or(AppError::Unauthorized)?;
    let callback_state = query.state.as_deref().ok_or(AppError::Unauthorized)?;
    if callback_state != state_cookie.value() {
        tracing::warn!("OAuth callback state does not match state cookie");
        return Err(AppError::Unauthorized);
    }

    let pkce_verifier = PkceCodeVerifier::new(
        jar.get(PKCE_COOKIE)
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_owned(),
    );

    let Some(code) = query.code else {
        tracing::warn!("OAuth callback arrived without an authorization code");
        return Ok((clear_transient_cookies(jar), Redirect::to("/login?error=auth")));
    };

    let client = create_oauth_client(&state.config)?;
    let token_response = match client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request_async(state.http_client.as_ref())
        .await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(%error, "Authorization code exchange failed");
            return Ok((clear_transient_cookies(jar), Redirect::to("/login?error=auth")));
        }
    };

    let access_token = token_response.access_token().secret().clone();
    let user_info = match fetch_google_user_info(&state, &access_token).await {
        Ok(info) => info,
        Err(error) => {
            tracing::warn!(%error, "Failed to fetch user info from Google");
            return Ok((clear_transient_cookies(jar), Redirect::to("/login?error=auth")));
        }
    };

    if user_info.verified_email == Some(false) {
        tracing::warn!(email = %user_info.email, "Rejecting sign-in with unverified email");
        return Ok((clear_transient_cookies(jar), Redirect::to("/login?error=auth")));
    }

    let user = SessionUser {
        name: user_info.name,
        email: user_info.email,
        image: user_info.picture,
    };

    let token = SessionToken::issue(
        user,
        access_token,
        state.config.auth.default_role.clone(),
        state.config.auth.session_max_age,
    );
    let signed = create_session_token(&token, &state.config.auth.session_secret)?;

    tracing::info!(email = %token.user.email, "User signed in");

    let session_cookie = Cookie::build((SESSION_COOKIE, signed))
        .path("/")
        .http_only(true)
        .secure(state.config.should_use_secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.config.auth.session_max_age));

    let jar = clear_transient_cookies(jar).add(session_cookie);
    Ok((jar, Redirect::to("/")))
}

/// Fetch the user's identity claims with the access token
async fn fetch_google_user_info(
    state: &AppState,
    access_token: &str,
) -> Result<GoogleUserInfo, AppError> {
    let response = state
        .http_client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::OAuth(format!(
            "Google userinfo returned {}",
            response.status()
        )));
    }

    Ok(response.json::<GoogleUserInfo>().await?)
}

// =============================================================================
// Logout
// =============================================================================

/// POST /logout
///
/// Clears the session cookie and redirects to home.
async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    tracing::info!("User signed out");

    let jar = clear_transient_cookies(jar).remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, Redirect::to("/"))
}

// =============================================================================
// Helpers
// =============================================================================

/// Build a short-lived HttpOnly cookie for OAuth round-trip state
fn transient_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(OAUTH_COOKIE_MAX_AGE_SECS))
        .build()
}

/// Drop the CSRF state and PKCE verifier cookies
fn clear_transient_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((STATE_COOKIE, "")).path("/"))
        .remove(Cookie::build((PKCE_COOKIE, "")).path("/"))
}
