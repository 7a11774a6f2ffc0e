//! Host-based tenant router.
//!
//! Edge middleware for a multi-tenant web platform: every request is
//! redirected, rewritten to an internal route on the upstream application,
//! or passed through, based on its hostname and path.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod session;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{HostRouter, RoutingDecision};
