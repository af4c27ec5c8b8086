//! Configuration management for the overrides Lambda.

use std::env;

use crate::{Error, Result};

const DEFAULT_PREFIX: &str = "overrides/";

/// Where override records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// S3 bucket (production)
    S3 {
        bucket: String,
        prefix: String,
        endpoint_url: Option<String>,
    },
    /// Process-local map, for local runs
    Memory,
}

/// Application configuration loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret that write requests must echo in `x-admin-key`
    pub admin_key: Option<String>,
    /// Secrets Manager ARN holding the admin key, used when `admin_key` is unset
    pub admin_key_secret_arn: Option<String>,
    /// Persistence backend
    pub store: StoreBackend,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let admin_key = non_empty("ADMIN_KEY").or_else(|| non_empty("NETLIFY_ADMIN_KEY"));

        let store = match non_empty("STORE_BACKEND").as_deref().unwrap_or("s3") {
            "s3" => StoreBackend::S3 {
                bucket: non_empty("OVERRIDES_BUCKET").ok_or_else(|| {
                    Error::Config("OVERRIDES_BUCKET is required for the s3 backend".to_string())
                })?,
                prefix: lookup("OVERRIDES_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
                endpoint_url: non_empty("S3_ENDPOINT_URL"),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(Error::Config(format!("unknown STORE_BACKEND '{}'", other)));
            }
        };

        Ok(Self {
            admin_key,
            admin_key_secret_arn: non_empty("ADMIN_KEY_SECRET_ARN"),
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_s3_backend_defaults() {
        let config = config_from(&[("OVERRIDES_BUCKET", "site-data")]).unwrap();
        assert_eq!(
            config.store,
            StoreBackend::S3 {
                bucket: "site-data".to_string(),
                prefix: "overrides/".to_string(),
                endpoint_url: None,
            }
        );
        assert!(config.admin_key.is_none());
    }

    #[test]
    fn test_missing_bucket_is_config_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_memory_backend_and_admin_key() {
        let config = config_from(&[("STORE_BACKEND", "memory"), ("ADMIN_KEY", "s3cret")]).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.admin_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_legacy_admin_key_variable() {
        let config =
            config_from(&[("STORE_BACKEND", "memory"), ("NETLIFY_ADMIN_KEY", "legacy")]).unwrap();
        assert_eq!(config.admin_key.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_empty_admin_key_is_unset() {
        let config = config_from(&[("STORE_BACKEND", "memory"), ("ADMIN_KEY", "")]).unwrap();
        assert!(config.admin_key.is_none());
    }

    #[test]
    fn test_unknown_backend() {
        let err = config_from(&[("STORE_BACKEND", "redis")]).unwrap_err();
        assert!(err.to_string().contains("redis"));
    }
}
