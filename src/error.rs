//! Error taxonomy.
//!
//! Routing errors are the only ones a client ever sees (as 400s); session
//! errors degrade to "not signed in"; upstream failures become 502s.

use axum::http::StatusCode;

/// The request cannot be routed.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("request has no host header")]
    MissingHostHeader,

    #[error("invalid host header: {0}")]
    InvalidHostHeader(String),

    #[error("cannot build redirect target: {0}")]
    InvalidRedirect(#[from] url::ParseError),
}

impl RoutingError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// Session lookup failed. Never fatal to a request.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("session service unavailable: {0}")]
    Unavailable(String),
}

/// Forwarding a request to the upstream failed.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid upstream target: {0}")]
    InvalidTarget(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ForwardError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// The server cannot be assembled from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("session provider: {0}")]
    Session(#[from] SessionError),

    #[error("invalid upstream address: {0}")]
    Upstream(#[from] axum::http::uri::InvalidUri),
}
