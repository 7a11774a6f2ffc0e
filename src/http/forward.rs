//! Forwarding to the upstream application server.
//!
//! # Responsibilities
//! - Replace the request target with the rewritten path (or keep it)
//! - Add X-Forwarded-Host and X-Forwarded-Proto
//! - Stream request and response bodies without buffering
//!
//! # Design Decisions
//! - The original Host header is preserved so the upstream sees the tenant
//! - Requests always leave as HTTP/1.1; the upstream speaks plain HTTP

use std::time::Duration;

use axum::body::Body;
use axum::http::{
    header, request::Parts, uri::{Authority, Scheme}, HeaderValue, Request, Uri, Version,
};
use axum::response::{IntoResponse, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::error::ForwardError;

pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// HTTP client bound to one upstream authority.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    public_scheme: HeaderValue,
}

impl Upstream {
    pub fn new(authority: Authority, connect_timeout: Duration, public_scheme: &str) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            authority,
            public_scheme: HeaderValue::from_str(public_scheme)
                .unwrap_or(HeaderValue::from_static("http")),
        }
    }

    pub fn from_config(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
        public_scheme: &str,
    ) -> Result<Self, axum::http::uri::InvalidUri> {
        let authority = upstream.address.parse::<Authority>()?;
        Ok(Self::new(
            authority,
            Duration::from_secs(timeouts.connect_secs),
            public_scheme,
        ))
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Send the request upstream, to `target` if given, else to its own path.
    pub async fn forward(
        &self,
        mut parts: Parts,
        body: Body,
        target: Option<&str>,
    ) -> Result<Response, ForwardError> {
        let path_and_query = match target {
            Some(target) => target.to_string(),
            None => parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
        };

        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?;

        let original_host = parts
            .headers
            .get(header::HOST)
            .cloned()
            .or_else(|| {
                parts
                    .uri
                    .authority()
                    .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
            });
        if let Some(host) = original_host {
            parts.headers.insert(X_FORWARDED_HOST, host.clone());
            parts.headers.entry(header::HOST).or_insert(host);
        }
        if !parts.headers.contains_key(X_FORWARDED_PROTO) {
            parts
                .headers
                .insert(X_FORWARDED_PROTO, self.public_scheme.clone());
        }

        parts.uri = uri;
        parts.version = Version::HTTP_11;

        let response = self.client.request(Request::from_parts(parts, body)).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_bad_address() {
        let upstream = UpstreamConfig {
            address: "not a host".to_string(),
        };
        assert!(Upstream::from_config(&upstream, &TimeoutConfig::default(), "http").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_error() {
        // Port 9 (discard) is closed on test machines.
        let upstream = Upstream::new(
            "127.0.0.1:9".parse().unwrap(),
            Duration::from_millis(200),
            "http",
        );
        let (parts, body) = Request::builder()
            .uri("/")
            .header("host", "example.com")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let err = upstream.forward(parts, body, Some("/home")).await.unwrap_err();
        assert!(matches!(err, ForwardError::Upstream(_)));
    }
}
