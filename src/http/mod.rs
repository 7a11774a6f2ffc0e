//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → [routing layer decides] (filter + host router)
//!     → response.rs (redirects, error statuses)
//!     → forward.rs (rewrite / pass-through to upstream)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::Upstream;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
