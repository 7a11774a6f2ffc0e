//! JWT-backed sessions.
//!
//! The token is read from `Authorization: Bearer <token>` first, then from
//! the configured session cookies in order. Tokens must be HS256-signed and
//! unexpired; an issuer can be required.
//!
//! Encrypted tokens (JWE) are not supported. NextAuth's default session
//! cookie is a JWE, so it reads as an invalid token (signed out) unless the
//! app is configured to put a signed JWT in the cookie.

use async_trait::async_trait;
use axum::http::{header, request::Parts, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::SessionError;
use crate::session::SessionProvider;

#[derive(Debug, Deserialize)]
struct SessionClaims {
    #[serde(default)]
    sub: Option<String>,
}

/// Verifies signed (JWS) session tokens. Encrypted cookies are rejected.
#[derive(Clone)]
pub struct JwtSession {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_names: Vec<String>,
}

impl std::fmt::Debug for JwtSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSession")
            .field("cookie_names", &self.cookie_names)
            .finish_non_exhaustive()
    }
}

impl JwtSession {
    pub fn new(secret: &[u8], cookie_names: Vec<String>, issuer: Option<&str>) -> Self {
        // Explicit algorithm prevents algorithm confusion
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            cookie_names,
        }
    }

    /// Find the session token in the request headers.
    pub fn extract_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if bearer.is_some() {
            return bearer;
        }

        self.cookie_names
            .iter()
            .find_map(|name| cookie_value(headers, name))
    }
}

/// Value of cookie `name` across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

#[async_trait]
impl SessionProvider for JwtSession {
    async fn is_authenticated(&self, parts: &Parts) -> Result<bool, SessionError> {
        let Some(token) = self.extract_token(&parts.headers) else {
            return Ok(false);
        };

        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        tracing::debug!(subject = ?data.claims.sub, "session token verified");
        Ok(true)
    }
}
