//! Login page

use axum::{
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::views;
use crate::auth::MaybeUser;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Set when a sign-in attempt failed (e.g. "?error=auth")
    error: Option<String>,
}

/// GET /login
///
/// Public. Already-authenticated visitors are redirected home before
/// any form renders. A failed sign-in attempt comes back here with
/// `?error=auth` and gets a visible error message.
pub async fn login_page(
    MaybeUser(session): MaybeUser,
    Query(query): Query<LoginQuery>,
) -> Response {
    if session.is_some() {
        return Redirect::to("/").into_response();
    }

    let error_notice = if query.error.is_some() {
        "<p>ログインに失敗しました。もう一度お試しください。</p>\n"
    } else {
        ""
    };

    let body = format!(
        r#"{header}
<main>
{error_notice}<form action="/auth/google" method="get">
<button type="submit">Googleでログイン</button>
</form>
</main>"#,
        header = views::header(None),
    );

    Html(views::layout("ログイン", &body)).into_response()
}
