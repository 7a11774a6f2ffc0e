//! Response construction.
//!
//! # Responsibilities
//! - Turn redirect decisions into 307/308 responses
//! - Map routing and forwarding errors to status codes
//!
//! # Design Decisions
//! - Host problems are the client's fault: 400
//! - Upstream failures: 502

use axum::response::{IntoResponse, Redirect, Response};

use crate::error::{ForwardError, RoutingError};
use crate::routing::RedirectKind;

/// Redirect response for a routing decision.
pub fn redirect(location: &str, kind: RedirectKind) -> Response {
    match kind {
        RedirectKind::Temporary => Redirect::temporary(location).into_response(),
        RedirectKind::Permanent => Redirect::permanent(location).into_response(),
    }
}

impl IntoResponse for RoutingError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let message = match &self {
            ForwardError::InvalidTarget(_) => "Cannot route request",
            ForwardError::Upstream(_) => "Upstream request failed",
        };
        (self.status(), message).into_response()
    }
}
