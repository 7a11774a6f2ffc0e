//! Host matching logic.
//!
//! # Responsibilities
//! - Match a normalized hostname (exact match, case-insensitive)
//! - Combine conditions with OR semantics
//! - Provide a wildcard for the fallback rule
//!
//! # Design Decisions
//! - Host matching is case-insensitive (RFC 9110)
//! - No regex to guarantee O(n) matching

/// Trait for matching a hostname against a condition.
pub trait HostMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the hostname matches this condition.
    fn matches(&self, host: &str) -> bool;
}

/// Matches one hostname exactly.
#[derive(Debug, Clone)]
pub struct ExactHost {
    expected_host: String,
}

impl ExactHost {
    /// Create a new host matcher.
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }
}

impl HostMatcher for ExactHost {
    fn matches(&self, host: &str) -> bool {
        host.eq_ignore_ascii_case(&self.expected_host)
    }
}

/// Matches every hostname.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyHost;

impl HostMatcher for AnyHost {
    fn matches(&self, _host: &str) -> bool {
        true
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct OneOf {
    matchers: Vec<Box<dyn HostMatcher>>,
}

impl OneOf {
    pub fn new(matchers: Vec<Box<dyn HostMatcher>>) -> Self {
        Self { matchers }
    }

    /// Exact match against any of `hosts`.
    pub fn hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            hosts
                .into_iter()
                .map(|h| Box::new(ExactHost::new(h)) as Box<dyn HostMatcher>)
                .collect(),
        )
    }
}

impl HostMatcher for OneOf {
    fn matches(&self, host: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(host))
    }
}
