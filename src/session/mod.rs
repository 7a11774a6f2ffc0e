//! Session lookup for the application area.
//!
//! # Data Flow
//! ```text
//! request parts (headers, cookies)
//!     → SessionProvider::is_authenticated
//!     → Ok(true) / Ok(false)          no token is simply "no session"
//!     → Err(SessionError)             router logs it and treats it as "no session"
//! ```
//!
//! # Design Decisions
//! - Capability trait so the router never knows how sessions are verified
//! - Lookup failures are never fatal to the request

pub mod jwt;
pub mod fixed;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::request::Parts;

use crate::config::SessionConfig;
use crate::error::SessionError;

pub use fixed::StaticSession;
pub use jwt::JwtSession;

/// Answers whether a request carries a valid session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn is_authenticated(&self, parts: &Parts) -> Result<bool, SessionError>;
}

/// Build the configured provider.
pub fn from_config(config: &SessionConfig) -> Result<Arc<dyn SessionProvider>, SessionError> {
    match config {
        SessionConfig::Static { authenticated } => {
            if *authenticated {
                tracing::warn!("static session provider: every app request is treated as signed in");
            }
            Ok(Arc::new(StaticSession::new(*authenticated)))
        }
        SessionConfig::Jwt {
            secret,
            cookie_names,
            issuer,
        } => {
            if secret.is_empty() {
                return Err(SessionError::Unavailable("empty JWT secret".to_string()));
            }
            Ok(Arc::new(JwtSession::new(
                secret.as_bytes(),
                cookie_names.clone(),
                issuer.as_deref(),
            )))
        }
    }
}
