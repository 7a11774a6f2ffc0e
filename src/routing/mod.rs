//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, headers)
//!     → filter.rs (framework paths and static files bypass routing)
//!     → host.rs (normalize hostname, rebuild path)
//!     → rules.rs (first matching host rule)
//!     → router.rs (session check, build decision)
//!     → Return: Redirect, Rewrite or PassThrough
//!
//! Rule Compilation (at startup):
//!     TenancyConfig
//!     → Ordered rules (app, marketing, root)
//!     → Wildcard tenant fallback
//!     → Freeze as immutable HostRouter
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (exact and prefix matching only)
//! - Deterministic: same input always produces the same decision
//! - First match wins

pub mod filter;
pub mod host;
pub mod matcher;
pub mod router;
pub mod rules;

pub use filter::PathFilter;
pub use router::{HostRouter, Routed, RoutingDecision};
pub use rules::{RedirectKind, RuleAction, RuleSet};
