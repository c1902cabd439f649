//! Home page

use axum::response::Html;

use super::views;
use crate::auth::MaybeUser;

/// GET /
///
/// Public. Renders the greeting for the current session, or the guest
/// greeting when there is none.
pub async fn home_page(MaybeUser(session): MaybeUser) -> Html<String> {
    let session = session.as_ref();
    let body = format!(
        "{}\n<main>\n{}\n</main>",
        views::header(session),
        views::session_section(session)
    );
    Html(views::layout("HOME", &body))
}
