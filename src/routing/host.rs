//! Hostname normalization and path reconstruction.
//!
//! # Responsibilities
//! - Extract the request host (Host header, then URI authority for HTTP/2)
//! - Reject hosts that are not a bare `host[:port]` authority
//! - Map local development subdomains onto the root domain
//! - Collapse preview-deployment hostnames onto tenant subdomains
//! - Rebuild the path-and-query string used by rewrites
//!
//! # Design Decisions
//! - Hostnames are lowercased (host matching is case-insensitive)
//! - Normalization is idempotent
//! - Query strings are passed through as received, never re-sorted

use axum::http::{header, request::Parts, uri::Authority, Uri};

use crate::config::TenancyConfig;
use crate::error::RoutingError;

/// Separator between the tenant label and the deployment id in preview hostnames.
pub const PREVIEW_SEPARATOR: &str = "---";

/// Read the host the client addressed.
pub fn request_host(parts: &Parts) -> Result<&str, RoutingError> {
    let host = match parts.headers.get(header::HOST) {
        Some(value) => value
            .to_str()
            .map_err(|_| RoutingError::InvalidHostHeader("non-ASCII host".to_string()))?,
        None => parts
            .uri
            .authority()
            .map(|a| a.as_str())
            .ok_or(RoutingError::MissingHostHeader)?,
    };

    let host = host.trim();
    if host.is_empty() {
        return Err(RoutingError::InvalidHostHeader("empty host".to_string()));
    }
    check_authority(host)?;
    Ok(host)
}

/// The host becomes the first segment of tenant rewrites and the origin of
/// redirects, so it must be `host[:port]` with no userinfo, path, query,
/// fragment or empty/dot-dot labels.
fn check_authority(host: &str) -> Result<(), RoutingError> {
    let invalid = || RoutingError::InvalidHostHeader(host.to_string());

    let authority = host.parse::<Authority>().map_err(|_| invalid())?;
    let name = authority.host();
    if host.contains('@') || name.is_empty() || name.starts_with('.') || name.contains("..") {
        return Err(invalid());
    }
    Ok(())
}

/// Normalize a raw host into the canonical tenant hostname.
///
/// `acme.localhost:3000` becomes `acme.{root}` and
/// `acme---git-branch.vercel.app` becomes `acme.{root}`. The result is
/// lowercased, so `Acme.localhost:3000` also becomes `acme.{root}`.
pub fn normalize_host(raw: &str, tenancy: &TenancyConfig) -> String {
    let mut hostname = raw.to_ascii_lowercase();

    let dev_suffix = format!(".{}", tenancy.dev_host);
    if let Some(label) = hostname.strip_suffix(&dev_suffix) {
        hostname = format!("{}.{}", label, tenancy.root_domain);
    }

    let preview_suffix = format!(".{}", tenancy.deployment_suffix);
    if hostname.contains(PREVIEW_SEPARATOR) && hostname.ends_with(&preview_suffix) {
        if let Some((label, _)) = hostname.split_once(PREVIEW_SEPARATOR) {
            hostname = format!("{}.{}", label, tenancy.root_domain);
        }
    }

    hostname
}

/// Path plus `?query` when the query is non-empty.
pub fn reconstruct_path(uri: &Uri) -> String {
    match uri.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", uri.path(), query),
        _ => uri.path().to_string(),
    }
}

/// Join an internal prefix and a request path. A bare `/` adds nothing.
pub fn join_prefix(prefix: &str, path: &str) -> String {
    if path == "/" {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn tenancy() -> TenancyConfig {
        TenancyConfig {
            root_domain: "example.com".to_string(),
            deployment_suffix: "vercel.app".to_string(),
            ..TenancyConfig::default()
        }
    }

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_localhost_subdomain_maps_to_root_domain() {
        let t = tenancy();
        for label in ["app", "demo", "a.b", "x-y"] {
            let raw = format!("{}.localhost:3000", label);
            assert_eq!(normalize_host(&raw, &t), format!("{}.example.com", label));
        }
    }

    #[test]
    fn test_localhost_subdomain_label_is_lowercased() {
        let t = tenancy();
        assert_eq!(normalize_host("Demo.localhost:3000", &t), "demo.example.com");
        assert_eq!(
            normalize_host("My-Shop.LOCALHOST:3000", &t),
            "my-shop.example.com"
        );
    }

    #[test]
    fn test_bare_dev_host_is_untouched() {
        assert_eq!(normalize_host("localhost:3000", &tenancy()), "localhost:3000");
    }

    #[test]
    fn test_preview_hostname_collapses_to_tenant() {
        let t = tenancy();
        assert_eq!(
            normalize_host("demo---feature-x.vercel.app", &t),
            "demo.example.com"
        );
        assert_eq!(
            normalize_host("demo---a---b.vercel.app", &t),
            "demo.example.com"
        );
    }

    #[test]
    fn test_preview_requires_suffix_and_separator() {
        let t = tenancy();
        assert_eq!(normalize_host("demo---x.other.app", &t), "demo---x.other.app");
        assert_eq!(normalize_host("demo.vercel.app", &t), "demo.vercel.app");
        // suffix must be a whole label boundary
        assert_eq!(normalize_host("demo---xvercel.app", &t), "demo---xvercel.app");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let t = tenancy();
        for raw in [
            "app.localhost:3000",
            "demo---feature.vercel.app",
            "localhost:3000",
            "Custom.Example.ORG",
            "example.com",
        ] {
            let once = normalize_host(raw, &t);
            assert_eq!(normalize_host(&once, &t), once, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_hostname_is_lowercased() {
        assert_eq!(normalize_host("MyCustom.COM", &tenancy()), "mycustom.com");
    }

    #[test]
    fn test_reconstruct_path() {
        let uri: Uri = "/about?x=1&b=2&a=3".parse().unwrap();
        assert_eq!(reconstruct_path(&uri), "/about?x=1&b=2&a=3");

        let uri: Uri = "/about?".parse().unwrap();
        assert_eq!(reconstruct_path(&uri), "/about");

        let uri: Uri = "http://example.com".parse().unwrap();
        assert_eq!(reconstruct_path(&uri), "/");
    }

    #[test]
    fn test_join_prefix() {
        assert_eq!(join_prefix("/app", "/"), "/app");
        assert_eq!(join_prefix("/app", "/settings"), "/app/settings");
        assert_eq!(join_prefix("/home", "/?x=1"), "/home/?x=1");
    }

    #[test]
    fn test_request_host_from_header() {
        let p = parts(Request::builder().uri("/").header("host", "demo.example.com"));
        assert_eq!(request_host(&p).unwrap(), "demo.example.com");
    }

    #[test]
    fn test_request_host_falls_back_to_authority() {
        let p = parts(Request::builder().uri("https://demo.example.com/path"));
        assert_eq!(request_host(&p).unwrap(), "demo.example.com");
    }

    #[test]
    fn test_missing_host() {
        let p = parts(Request::builder().uri("/path"));
        assert!(matches!(request_host(&p), Err(RoutingError::MissingHostHeader)));
    }

    #[test]
    fn test_malformed_hosts_are_rejected() {
        for host in [
            "evil/../app",
            "x?y",
            "a#b",
            "a@b",
            "evil.com@app.example.com",
            "..",
            ".hidden.com",
            "a..b.com",
            ":3000",
        ] {
            let p = parts(Request::builder().uri("/settings").header("host", host));
            assert!(
                matches!(request_host(&p), Err(RoutingError::InvalidHostHeader(_))),
                "{} should be rejected",
                host
            );
        }
    }

    #[test]
    fn test_well_formed_hosts_are_accepted() {
        for host in ["example.com", "demo.localhost:3000", "[::1]:8080", "a-b---c.vercel.app"] {
            let p = parts(Request::builder().uri("/").header("host", host));
            assert_eq!(request_host(&p).unwrap(), host);
        }
    }

    #[test]
    fn test_empty_host() {
        let p = parts(Request::builder().uri("/").header("host", ""));
        assert!(matches!(request_host(&p), Err(RoutingError::InvalidHostHeader(_))));
    }
}
