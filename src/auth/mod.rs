//! Google OAuth authentication
//!
//! Handles:
//! - Google OAuth flow
//! - Session management
//! - Session retrieval for page handlers

mod middleware;
mod oauth;
pub mod session;

pub use middleware::MaybeUser;
pub use oauth::auth_router;
pub use session::{Session, SessionToken, SessionUser, create_session_token, verify_session_token};
