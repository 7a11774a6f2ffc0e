//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate hostnames, path prefixes and addresses
//! - Reject layouts that would make host normalization ambiguous
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::uri::Authority;
use url::Url;

use crate::config::schema::{RouterConfig, SessionConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is not a valid host: {value}")]
    InvalidHost { field: &'static str, value: String },

    #[error("tenancy.root_domain must not contain the preview separator '---': {0}")]
    PreviewSeparatorInRootDomain(String),

    #[error("{field} must start with '/' and must not end with '/': {value}")]
    InvalidPathPrefix { field: &'static str, value: String },

    #[error("{field} is not a socket address: {value}")]
    InvalidSocketAddr { field: &'static str, value: String },

    #[error("{field} must be an absolute http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("listener.public_scheme must be http or https: {0}")]
    InvalidScheme(String),

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_socket_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if !matches!(config.listener.public_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::InvalidScheme(
            config.listener.public_scheme.clone(),
        ));
    }

    let tenancy = &config.tenancy;
    check_host(&mut errors, "tenancy.root_domain", &tenancy.root_domain);
    if tenancy.root_domain.contains("---") {
        errors.push(ValidationError::PreviewSeparatorInRootDomain(
            tenancy.root_domain.clone(),
        ));
    }
    check_host(&mut errors, "tenancy.deployment_suffix", &tenancy.deployment_suffix);
    check_host(&mut errors, "tenancy.app_subdomain", &tenancy.app_subdomain);
    check_host(&mut errors, "tenancy.dev_host", &tenancy.dev_host);
    check_prefix(&mut errors, "tenancy.app_prefix", &tenancy.app_prefix);
    check_prefix(&mut errors, "tenancy.home_prefix", &tenancy.home_prefix);
    check_prefix(&mut errors, "tenancy.login_path", &tenancy.login_path);

    if tenancy.marketing.enabled {
        check_host(&mut errors, "tenancy.marketing.host", &tenancy.marketing.host);
        let location_ok = Url::parse(&tenancy.marketing.location)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !location_ok {
            errors.push(ValidationError::InvalidUrl {
                field: "tenancy.marketing.location",
                value: tenancy.marketing.location.clone(),
            });
        }
    }

    for prefix in &config.filter.excluded_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPathPrefix {
                field: "filter.excluded_prefixes",
                value: prefix.clone(),
            });
        }
    }

    if let SessionConfig::Jwt { secret, cookie_names, .. } = &config.session {
        if secret.is_empty() {
            errors.push(ValidationError::Empty { field: "session.secret" });
        }
        if cookie_names.iter().any(|c| c.is_empty()) {
            errors.push(ValidationError::Empty { field: "session.cookie_names" });
        }
    }

    check_host(&mut errors, "upstream.address", &config.upstream.address);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.connect_secs" });
    }

    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_host(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError::Empty { field });
        return;
    }
    // A bare authority: no scheme, no path, no userinfo.
    let valid = value.parse::<Authority>().is_ok() && !value.contains('@');
    if !valid {
        errors.push(ValidationError::InvalidHost {
            field,
            value: value.to_string(),
        });
    }
}

fn check_prefix(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') || (value.len() > 1 && value.ends_with('/')) || value == "/" {
        errors.push(ValidationError::InvalidPathPrefix {
            field,
            value: value.to_string(),
        });
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidSocketAddr {
            field,
            value: value.to_string(),
        });
    }
}
