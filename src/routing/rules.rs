//! Ordered host rules.
//!
//! Rules are evaluated top to bottom and the first match wins. The set
//! always ends with a wildcard, so every hostname resolves to exactly one
//! rule:
//!
//! ```text
//! app        app.{root}                 → session check, rewrite under /app
//! marketing  configured marketing host  → external redirect
//! root       {dev_host} | {root}        → rewrite under /home
//! tenant     *                          → rewrite to /{hostname}{path}
//! ```

use serde::Serialize;

use crate::config::TenancyConfig;
use crate::routing::matcher::{AnyHost, ExactHost, HostMatcher, OneOf};

/// What a rule does once its host matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Authenticated application area.
    AppArea { prefix: String, login_path: String },
    /// Fixed external redirect.
    Redirect { location: String, kind: RedirectKind },
    /// Rewrite under a fixed internal prefix.
    Rewrite { prefix: String },
    /// Rewrite to `/{hostname}{path}`.
    TenantRewrite,
}

/// HTTP redirect flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectKind {
    /// 307 Temporary Redirect.
    Temporary,
    /// 308 Permanent Redirect.
    Permanent,
}

/// A named (matcher, action) pair.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    matcher: Box<dyn HostMatcher>,
    pub action: RuleAction,
}

impl Rule {
    pub fn new(name: &'static str, matcher: Box<dyn HostMatcher>, action: RuleAction) -> Self {
        Self {
            name,
            matcher,
            action,
        }
    }

    pub fn matches(&self, host: &str) -> bool {
        self.matcher.matches(host)
    }
}

/// Immutable, ordered rule list.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
    fallback: Rule,
}

impl RuleSet {
    /// Build the rule list for a tenancy layout.
    pub fn from_config(tenancy: &TenancyConfig) -> Self {
        let mut rules = vec![Rule::new(
            "app",
            Box::new(ExactHost::new(tenancy.app_host())),
            RuleAction::AppArea {
                prefix: tenancy.app_prefix.clone(),
                login_path: tenancy.login_path.clone(),
            },
        )];

        let marketing = &tenancy.marketing;
        if marketing.enabled {
            let kind = if marketing.permanent {
                RedirectKind::Permanent
            } else {
                RedirectKind::Temporary
            };
            rules.push(Rule::new(
                "marketing",
                Box::new(ExactHost::new(marketing.host.clone())),
                RuleAction::Redirect {
                    location: marketing.location.clone(),
                    kind,
                },
            ));
        }

        rules.push(Rule::new(
            "root",
            Box::new(OneOf::hosts([
                tenancy.dev_host.clone(),
                tenancy.root_domain.clone(),
            ])),
            RuleAction::Rewrite {
                prefix: tenancy.home_prefix.clone(),
            },
        ));

        Self {
            rules,
            fallback: Rule::new("tenant", Box::new(AnyHost), RuleAction::TenantRewrite),
        }
    }

    /// First rule whose matcher accepts `host`.
    pub fn resolve(&self, host: &str) -> &Rule {
        self.rules
            .iter()
            .find(|rule| rule.matches(host))
            .unwrap_or(&self.fallback)
    }

    /// Rule names in evaluation order, fallback last.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .chain(std::iter::once(&self.fallback))
            .map(|rule| rule.name)
            .collect()
    }
}
