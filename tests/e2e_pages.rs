//! E2E tests for the server-rendered pages

mod common;

use common::TestServer;

fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build no-redirect client")
}

#[tokio::test]
async fn test_home_greets_guest_without_session() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("ようこそ、ゲストさん"));
    assert!(body.contains("ログイン"));
    assert!(!body.contains("ログアウト"));
}

#[tokio::test]
async fn test_home_greets_member_with_session() {
    let server = TestServer::new().await;
    let cookie = server.session_cookie(
        Some("Taro Yamada"),
        "taro@example.com",
        Some("https://lh3.googleusercontent.com/a/photo=s96-c"),
    );

    let response = server
        .client
        .get(server.url("/"))
        .header("Cookie", cookie)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("ようこそ、Taro Yamadaさん"));
    assert!(body.contains("あなたはtaro@example.comで ログインしています"));
    assert!(body.contains("ログアウト"));
    assert!(body.contains(r#"href="/profile""#));
}

#[tokio::test]
async fn test_home_ignores_tampered_session_cookie() {
    let server = TestServer::new().await;
    let cookie = server.session_cookie(Some("Taro Yamada"), "taro@example.com", None);
    // Flip the signature by replacing it wholesale
    let tampered = format!(
        "{}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        cookie.split('.').next().unwrap()
    );

    let response = server
        .client
        .get(server.url("/"))
        .header("Cookie", tampered)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("ようこそ、ゲストさん"));
}

#[tokio::test]
async fn test_login_redirects_authenticated_visitor_home() {
    let server = TestServer::new().await;
    let client = no_redirect_client();
    let cookie = server.session_cookie(Some("Taro Yamada"), "taro@example.com", None);

    let response = client
        .get(server.url("/login"))
        .header("Cookie", cookie)
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    assert_eq!(location, "/");
}

#[tokio::test]
async fn test_profile_redirects_unauthenticated_to_login() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let response = client
        .get(server.url("/profile"))
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    assert_eq!(location, "/login");
}

#[tokio::test]
async fn test_profile_renders_user_details_with_session() {
    let server = TestServer::new().await;
    let cookie = server.session_cookie(
        Some("Taro Yamada"),
        "taro@example.com",
        Some("https://lh3.googleusercontent.com/a/photo=s96-c"),
    );

    let response = server
        .client
        .get(server.url("/profile"))
        .header("Cookie", cookie)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("Taro Yamada"));
    assert!(body.contains("taro@example.com"));
    assert!(body.contains("googleusercontent.com"));
}
