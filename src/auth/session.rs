//! Session management
//!
//! Uses HMAC-signed tokens stored in cookies.
//! No server-side session storage needed.
//!
//! Two shapes exist on purpose: [`SessionToken`] is the internal,
//! self-contained token (it carries the provider access token and never
//! leaves the cookie), while [`Session`] is the outward-facing value the
//! views receive.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Identity claims for the signed-in user
///
/// Populated from the provider's userinfo response on first issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: String,
    /// Avatar image URL
    pub image: Option<String>,
}

/// Internal session token
///
/// Stored in a signed cookie. Self-contained: everything needed to
/// rebuild the session lives in the token itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    /// User identity from the provider
    pub user: SessionUser,
    /// Role claim
    pub role: String,
    /// Provider access token, kept in the token but never exposed to views
    pub access_token: String,
    /// When the token was issued
    pub created_at: DateTime<Utc>,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

/// Outward-facing session, as handed to the views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    /// Role claim, copied from the token
    pub role: String,
    /// Expiry timestamp
    pub expires: DateTime<Utc>,
}

impl SessionToken {
    /// Issue a fresh token for a newly authenticated user
    ///
    /// Merges the provider identity, the provider access token and the
    /// role claim into the token. Runs once, at sign-in.
    pub fn issue(user: SessionUser, access_token: String, role: String, max_age: i64) -> Self {
        let now = Utc::now();
        Self {
            user,
            role,
            access_token,
            created_at: now,
            expires_at: now + Duration::seconds(max_age),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Build the outward-facing session from this token
    ///
    /// Copies the role claim and expiry; the access token stays behind.
    pub fn expose(&self) -> Session {
        Session {
            user: self.user.clone(),
            role: self.role.clone(),
            expires: self.expires_at,
        }
    }
}

/// Create a signed session token string
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
///
/// # Arguments
/// * `token` - Token data to encode
/// * `secret` - HMAC secret key
pub fn create_session_token(
    token: &SessionToken,
    secret: &str,
) -> Result<String, crate::error::AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let payload =
        serde_json::to_string(token).map_err(|e| crate::error::AppError::Internal(e.into()))?;
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| crate::error::AppError::Encryption(e.to_string()))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Verify and decode a session token string
///
/// # Errors
/// Returns `InvalidSignature` if the signature does not match, and
/// `Unauthorized` if the token is malformed or expired.
pub fn verify_session_token(
    token: &str,
    secret: &str,
) -> Result<SessionToken, crate::error::AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let (payload_b64, signature_b64) = token
        .split_once('.')
        .ok_or(crate::error::AppError::Unauthorized)?;
    if signature_b64.contains('.') {
        return Err(crate::error::AppError::Unauthorized);
    }

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| crate::error::AppError::Encryption(e.to_string()))?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| crate::error::AppError::Unauthorized)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| crate::error::AppError::InvalidSignature)?;

    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| crate::error::AppError::Unauthorized)?;
    let payload_str =
        String::from_utf8(payload_bytes).map_err(|_| crate::error::AppError::Unauthorized)?;
    let session_token: SessionToken =
        serde_json::from_str(&payload_str).map_err(|_| crate::error::AppError::Unauthorized)?;

    if session_token.is_expired() {
        return Err(crate::error::AppError::Unauthorized);
    }

    Ok(session_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const SECRET: &str = "test-secret-key-32-bytes-long!!!";

    fn taro() -> SessionUser {
        SessionUser {
            name: Some("Taro Yamada".to_string()),
            email: "taro@example.com".to_string(),
            image: Some("https://lh3.googleusercontent.com/a/photo=s96-c".to_string()),
        }
    }

    #[test]
    fn token_round_trip() {
        let token = SessionToken::issue(taro(), "ya29.access".to_string(), "member".to_string(), 3600);
        let signed = create_session_token(&token, SECRET).unwrap();

        let decoded = verify_session_token(&signed, SECRET).unwrap();
        assert_eq!(decoded.user, token.user);
        assert_eq!(decoded.role, "member");
        assert_eq!(decoded.access_token, "ya29.access");
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = SessionToken::issue(taro(), "ya29.access".to_string(), "member".to_string(), 3600);
        let signed = create_session_token(&token, SECRET).unwrap();

        let (payload, _) = signed.split_once('.').unwrap();
        let forged = format!("{payload}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
        assert!(matches!(
            verify_session_token(&forged, SECRET),
            Err(AppError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = SessionToken::issue(taro(), "ya29.access".to_string(), "member".to_string(), 3600);
        let signed = create_session_token(&token, SECRET).unwrap();

        assert!(matches!(
            verify_session_token(&signed, "another-secret-key-32-bytes-long"),
            Err(AppError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut token =
            SessionToken::issue(taro(), "ya29.access".to_string(), "member".to_string(), 3600);
        token.expires_at = Utc::now() - Duration::seconds(1);
        let signed = create_session_token(&token, SECRET).unwrap();

        assert!(matches!(
            verify_session_token(&signed, SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(
            verify_session_token("not-a-token", SECRET),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verify_session_token("a.b.c", SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn exposed_session_carries_token_role() {
        let token = SessionToken::issue(taro(), "ya29.access".to_string(), "member".to_string(), 3600);
        let session = token.expose();

        assert_eq!(session.role, token.role);
        assert_eq!(session.user, token.user);
        assert_eq!(session.expires, token.expires_at);
    }
}
