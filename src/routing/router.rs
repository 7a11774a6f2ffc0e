//! Host router.
//!
//! # Responsibilities
//! - Normalize the request host and rebuild the path
//! - Resolve the first matching host rule
//! - Consult the session provider for the application area
//! - Produce exactly one routing decision per request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure function of (hostname, path, session state)
//! - Session lookup failures count as "signed out", never as errors

use std::sync::Arc;

use axum::http::request::Parts;
use serde::Serialize;
use url::Url;

use crate::config::{RouterConfig, TenancyConfig};
use crate::error::{RoutingError, SessionError};
use crate::routing::host::{join_prefix, normalize_host, reconstruct_path, request_host};
use crate::routing::rules::{RedirectKind, RuleAction, RuleSet};
use crate::session::SessionProvider;

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Tell the client to navigate to `location`.
    Redirect { location: String, kind: RedirectKind },
    /// Serve `path` (path and query) without the client seeing it.
    Rewrite { path: String },
    /// Forward the request unmodified.
    PassThrough,
}

impl RoutingDecision {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RoutingDecision::Redirect { .. } => "redirect",
            RoutingDecision::Rewrite { .. } => "rewrite",
            RoutingDecision::PassThrough => "pass_through",
        }
    }
}

/// A decision plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routed {
    pub rule: &'static str,
    pub hostname: String,
    #[serde(flatten)]
    pub decision: RoutingDecision,
}

/// Maps hostnames and paths onto redirects and internal rewrites.
pub struct HostRouter {
    tenancy: TenancyConfig,
    rules: RuleSet,
    sessions: Arc<dyn SessionProvider>,
    public_scheme: String,
}

impl HostRouter {
    pub fn new(
        tenancy: TenancyConfig,
        sessions: Arc<dyn SessionProvider>,
        public_scheme: impl Into<String>,
    ) -> Self {
        let rules = RuleSet::from_config(&tenancy);
        tracing::debug!(rules = ?rules.names(), "host rules compiled");
        Self {
            tenancy,
            rules,
            sessions,
            public_scheme: public_scheme.into(),
        }
    }

    pub fn from_config(config: &RouterConfig, sessions: Arc<dyn SessionProvider>) -> Self {
        Self::new(
            config.tenancy.clone(),
            sessions,
            config.listener.public_scheme.clone(),
        )
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Route a request.
    pub async fn route(&self, parts: &Parts) -> Result<RoutingDecision, RoutingError> {
        self.evaluate(parts).await.map(|routed| routed.decision)
    }

    /// Route a request and report which rule decided.
    pub async fn evaluate(&self, parts: &Parts) -> Result<Routed, RoutingError> {
        let raw_host = request_host(parts)?;
        let hostname = normalize_host(raw_host, &self.tenancy);
        let path = reconstruct_path(&parts.uri);

        tracing::debug!(
            %hostname,
            query = parts.uri.query().unwrap_or_default(),
            %path,
            "routing request"
        );

        let rule = self.rules.resolve(&hostname);
        let decision = match &rule.action {
            RuleAction::AppArea { prefix, login_path } => {
                let signed_in = self.session_state(parts).await;
                // Exact match on path plus query: `/login?next=..` is not the login page.
                let on_login = path == *login_path;

                if !signed_in && !on_login {
                    RoutingDecision::Redirect {
                        location: self.same_origin(parts, raw_host, login_path)?,
                        kind: RedirectKind::Temporary,
                    }
                } else if signed_in && on_login {
                    RoutingDecision::Redirect {
                        location: self.same_origin(parts, raw_host, "/")?,
                        kind: RedirectKind::Temporary,
                    }
                } else {
                    RoutingDecision::Rewrite {
                        path: join_prefix(prefix, &path),
                    }
                }
            }
            RuleAction::Redirect { location, kind } => RoutingDecision::Redirect {
                location: location.clone(),
                kind: *kind,
            },
            RuleAction::Rewrite { prefix } => RoutingDecision::Rewrite {
                path: join_prefix(prefix, &path),
            },
            RuleAction::TenantRewrite => RoutingDecision::Rewrite {
                path: join_prefix(&format!("/{}", hostname), &path),
            },
        };

        tracing::debug!(rule = rule.name, ?decision, "routing decision");

        Ok(Routed {
            rule: rule.name,
            hostname,
            decision,
        })
    }

    async fn session_state(&self, parts: &Parts) -> bool {
        match self.sessions.is_authenticated(parts).await {
            Ok(signed_in) => signed_in,
            Err(SessionError::InvalidToken(e)) => {
                tracing::debug!(error = %e, "rejected session token");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "session lookup failed, treating request as signed out");
                false
            }
        }
    }

    /// Absolute URL for `target` on the origin the client addressed.
    fn same_origin(&self, parts: &Parts, raw_host: &str, target: &str) -> Result<String, RoutingError> {
        let scheme = forwarded_proto(parts).unwrap_or(self.public_scheme.as_str());
        let base = Url::parse(&format!("{}://{}/", scheme, raw_host))?;
        Ok(base.join(target)?.to_string())
    }
}

/// Scheme reported by a fronting proxy, if it is http or https.
fn forwarded_proto(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|proto| matches!(*proto, "http" | "https"))
}
