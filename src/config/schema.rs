//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tenant router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, public scheme).
    pub listener: ListenerConfig,

    /// Domain layout of the platform.
    pub tenancy: TenancyConfig,

    /// Path pre-filter applied before host routing.
    pub filter: FilterConfig,

    /// Session provider for the app subdomain.
    pub session: SessionConfig,

    /// Application server that receives rewritten requests.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme used when building absolute redirect URLs and no
    /// `x-forwarded-proto` header is present.
    pub public_scheme: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            public_scheme: "http".to_string(),
        }
    }
}

/// Domain layout: which hostnames mean what.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TenancyConfig {
    /// Root domain of the platform (e.g., "example.com").
    pub root_domain: String,

    /// Domain suffix of preview deployments (e.g., "vercel.app").
    pub deployment_suffix: String,

    /// Subdomain label of the authenticated application area.
    pub app_subdomain: String,

    /// Local development host. Subdomains of it are mapped onto the root domain.
    pub dev_host: String,

    /// Internal prefix for the application area.
    pub app_prefix: String,

    /// Internal prefix for the root (home) site.
    pub home_prefix: String,

    /// Login page path inside the application area.
    pub login_path: String,

    /// Hostname that is redirected to an external page.
    pub marketing: MarketingRedirect,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            root_domain: "example.com".to_string(),
            deployment_suffix: "vercel.app".to_string(),
            app_subdomain: "app".to_string(),
            dev_host: "localhost:3000".to_string(),
            app_prefix: "/app".to_string(),
            home_prefix: "/home".to_string(),
            login_path: "/login".to_string(),
            marketing: MarketingRedirect::default(),
        }
    }
}

impl TenancyConfig {
    /// Full hostname of the application area (e.g., "app.example.com").
    pub fn app_host(&self) -> String {
        format!("{}.{}", self.app_subdomain, self.root_domain)
    }
}

/// A hostname that redirects every request to a fixed external URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketingRedirect {
    /// Disable to route the hostname like any other tenant.
    pub enabled: bool,

    /// Hostname to match (exact, case-insensitive).
    pub host: String,

    /// Absolute URL to redirect to.
    pub location: String,

    /// Use 308 instead of 307.
    pub permanent: bool,
}

impl Default for MarketingRedirect {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "vercel.pub".to_string(),
            location: "https://vercel.com/blog/platforms-starter-kit".to_string(),
            permanent: true,
        }
    }
}

/// Path pre-filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Requests whose path starts with one of these bypass host routing.
    pub excluded_prefixes: Vec<String>,

    /// Let requests whose last path segment looks like a file
    /// (e.g. `/favicon.ico`, `/blog/cover.png`) bypass host routing.
    pub skip_static_files: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_prefixes: vec![
                "/api/".to_string(),
                "/_next/".to_string(),
                "/_static/".to_string(),
                "/_vercel".to_string(),
            ],
            skip_static_files: true,
        }
    }
}

/// Session provider selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum SessionConfig {
    /// Constant answer, no verification.
    Static {
        #[serde(default = "default_authenticated")]
        authenticated: bool,
    },
    /// HS256-signed JWT taken from a bearer header or session cookie.
    ///
    /// Only signed tokens (JWS) are accepted. NextAuth encrypts its session
    /// cookie (JWE) by default, so the default cookie names only work when
    /// the app issues signed JWTs in those cookies.
    Jwt {
        /// Shared signing secret.
        #[serde(default, skip_serializing)]
        secret: String,

        /// Cookies searched for a token, in order.
        #[serde(default = "default_cookie_names")]
        cookie_names: Vec<String>,

        /// Required `iss` claim, if any.
        #[serde(default)]
        issuer: Option<String>,
    },
}

fn default_authenticated() -> bool {
    true
}

fn default_cookie_names() -> Vec<String> {
    vec![
        "next-auth.session-token".to_string(),
        "__Secure-next-auth.session-token".to_string(),
    ]
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::Static {
            authenticated: true,
        }
    }
}

/// Upstream application server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream authority (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
