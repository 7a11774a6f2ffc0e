//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{RouterConfig, SessionConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables that override file settings.
pub const ENV_ROOT_DOMAIN: &str = "ROOT_DOMAIN";
pub const ENV_DEPLOYMENT_SUFFIX: &str = "VERCEL_DEPLOYMENT_SUFFIX";
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";
pub const ENV_UPSTREAM_ADDRESS: &str = "UPSTREAM_ADDRESS";

/// Load, apply environment overrides, and validate configuration.
///
/// Without a path the defaults are used as the base.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => RouterConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut RouterConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(root_domain) = lookup(ENV_ROOT_DOMAIN) {
        tracing::debug!(%root_domain, "root domain taken from environment");
        config.tenancy.root_domain = root_domain;
    }
    if let Some(suffix) = lookup(ENV_DEPLOYMENT_SUFFIX) {
        config.tenancy.deployment_suffix = suffix;
    }
    if let Some(address) = lookup(ENV_UPSTREAM_ADDRESS) {
        config.upstream.address = address;
    }
    if let SessionConfig::Jwt { secret, .. } = &mut config.session {
        if let Some(value) = lookup(ENV_SESSION_SECRET) {
            *secret = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_tenancy() {
        let mut config = RouterConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_ROOT_DOMAIN, "acme.io"),
                (ENV_DEPLOYMENT_SUFFIX, "preview.acme.net"),
                (ENV_UPSTREAM_ADDRESS, "10.0.0.5:3000"),
            ]),
        );

        assert_eq!(config.tenancy.root_domain, "acme.io");
        assert_eq!(config.tenancy.deployment_suffix, "preview.acme.net");
        assert_eq!(config.upstream.address, "10.0.0.5:3000");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = RouterConfig::default();
        apply_env_overrides(&mut config, env(&[(ENV_ROOT_DOMAIN, "")]));
        assert_eq!(config.tenancy.root_domain, "example.com");
    }

    #[test]
    fn test_session_secret_only_applies_to_jwt() {
        let mut config = RouterConfig::default();
        apply_env_overrides(&mut config, env(&[(ENV_SESSION_SECRET, "abc")]));
        assert!(matches!(config.session, SessionConfig::Static { .. }));

        config.session = SessionConfig::Jwt {
            secret: String::new(),
            cookie_names: vec!["session".to_string()],
            issuer: None,
        };
        apply_env_overrides(&mut config, env(&[(ENV_SESSION_SECRET, "abc")]));
        match config.session {
            SessionConfig::Jwt { secret, .. } => assert_eq!(secret, "abc"),
            other => panic!("unexpected session config: {:?}", other),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [tenancy]
            root_domain = "platform.test"
            "#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_load_config_reports_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [tenancy]
            home_prefix = "home"
            "#
        )
        .unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("tenancy.home_prefix"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[tenancy\nroot_domain = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
