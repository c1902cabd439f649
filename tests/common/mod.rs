//! Common test utilities for E2E tests

use aikagi::auth::{SessionToken, SessionUser, create_session_token, session::SESSION_COOKIE};
use aikagi::{AppState, config};
use tokio::net::TcpListener;

/// Session secret shared by the test configuration and forged cookies
pub const TEST_SESSION_SECRET: &str = "test-secret-key-32-bytes-long!!!";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        let config = test_config();

        // Initialize app state
        let state = AppState::new(config).unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = aikagi::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            client,
        }
    }

    /// Build a full URL for the given path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Forge a valid signed session cookie for the given user
    ///
    /// Signs with the test secret, so the server accepts it like a
    /// cookie issued by a real sign-in.
    pub fn session_cookie(&self, name: Option<&str>, email: &str, image: Option<&str>) -> String {
        let token = SessionToken::issue(
            SessionUser {
                name: name.map(ToOwned::to_owned),
                email: email.to_owned(),
                image: image.map(ToOwned::to_owned),
            },
            "test-access-token".to_string(),
            "member".to_string(),
            3600,
        );
        let signed = create_session_token(&token, TEST_SESSION_SECRET).unwrap();
        format!("{SESSION_COOKIE}={signed}")
    }
}

/// Create the test configuration
pub fn test_config() -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Let OS assign port
            domain: "localhost".to_string(),
            protocol: "http".to_string(),
        },
        auth: config::AuthConfig {
            session_secret: TEST_SESSION_SECRET.to_string(),
            session_max_age: 604800,
            default_role: "member".to_string(),
            google: config::GoogleOAuthConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
            },
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}
