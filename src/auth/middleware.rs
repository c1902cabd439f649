//! Session retrieval boundary
//!
//! Resolves the current session from the request once per
//! server-rendered page. Pages branch on the result themselves; an
//! invalid or expired token is the same as no session at all.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;

use super::session::{SESSION_COOKIE, Session, verify_session_token};
use crate::AppState;

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Optional current user extractor
///
/// Resolves to `None` instead of rejecting when the request carries no
/// valid session cookie.
///
/// # Usage
/// ```ignore
/// async fn handler(MaybeUser(session): MaybeUser) -> impl IntoResponse {
///     match session {
///         Some(session) => ...,
///         None => ...,
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Session>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>().cloned() {
            return Ok(MaybeUser(Some(session)));
        }

        let app_state = AppState::from_ref(state);
        let session = extract_token_from_headers(&parts.headers)
            .and_then(|token| {
                verify_session_token(&token, &app_state.config.auth.session_secret).ok()
            })
            .map(|token| token.expose());

        if let Some(session) = &session {
            parts.extensions.insert(session.clone());
        }

        Ok(MaybeUser(session))
    }
}
