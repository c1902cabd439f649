//! View rendering
//!
//! Pure functions from `Option<&Session>` to HTML. All user-controlled
//! text goes through `html-escape` before it reaches the markup.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::auth::Session;

/// Shared page skeleton
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>"#,
        title = encode_text(title),
        body = body,
    )
}

/// Site header
///
/// Shows the profile-image link and a logout button when a session is
/// present, a login link otherwise. Never both.
pub fn header(session: Option<&Session>) -> String {
    let nav = match session {
        Some(session) => {
            let image = session.user.image.as_deref().unwrap_or("");
            let name = display_name(session);
            format!(
                r#"<li><a href="/profile"><img src="{image}" alt="{name}" width="40" height="40"></a></li>
<li><form method="post" action="/logout"><button type="submit">ログアウト</button></form></li>"#,
                image = encode_double_quoted_attribute(image),
                name = encode_double_quoted_attribute(&name),
            )
        }
        None => r#"<li><a href="/login"><button type="button">ログイン</button></a></li>"#
            .to_string(),
    };

    format!(
        r#"<header>
<a href="/">HOME</a>
<ul>
{nav}
</ul>
</header>"#
    )
}

/// Home page greeting
///
/// Personalized when a session is present, generic otherwise.
pub fn session_section(session: Option<&Session>) -> String {
    match session {
        Some(session) => {
            let name = display_name(session);
            format!(
                r#"<div>
<h1>ようこそ、{name}さん</h1>
<p>あなたは{email}で ログインしています</p>
</div>"#,
                name = encode_text(&name),
                email = encode_text(&session.user.email),
            )
        }
        None => r#"<div>
<h1>ようこそ、ゲストさん</h1>
<p>ログインしてください</p>
</div>"#
            .to_string(),
    }
}

/// Display name for the signed-in user, falling back to the email
fn display_name(session: &Session) -> String {
    session
        .user
        .name
        .clone()
        .unwrap_or_else(|| session.user.email.clone())
}
