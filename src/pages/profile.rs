//! Profile page

use axum::response::{Html, IntoResponse, Redirect, Response};
use html_escape::{encode_double_quoted_attribute, encode_text};

use super::views;
use crate::auth::MaybeUser;

/// GET /profile
///
/// Requires an authenticated session: the handler resolves the session
/// and redirects to the login page when there is none.
pub async fn profile_page(MaybeUser(session): MaybeUser) -> Response {
    let Some(session) = session else {
        return Redirect::to("/login").into_response();
    };

    let avatar = match session.user.image.as_deref() {
        Some(image) => format!(
            r#"<img src="{}" alt="" width="96" height="96">"#,
            encode_double_quoted_attribute(image)
        ),
        None => String::new(),
    };
    let name = session.user.name.as_deref().unwrap_or("");

    let body = format!(
        r#"{header}
<main>
{avatar}
<div>{name}</div>
<div>{email}</div>
</main>"#,
        header = views::header(Some(&session)),
        name = encode_text(name),
        email = encode_text(&session.user.email),
    );

    Html(views::layout("プロフィール", &body)).into_response()
}
