//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;

use crate::{Error, Result};

/// JSON shape accepted for a structured admin key secret.
#[derive(Debug, Deserialize)]
struct AdminKeySecret {
    #[serde(alias = "adminKey")]
    admin_key: String,
}

/// Get a secret string from Secrets Manager.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    response
        .secret_string()
        .map(String::from)
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))
}

/// Fetch the admin key, `None` when the secret is empty.
pub async fn fetch_admin_key(client: &SecretsClient, secret_arn: &str) -> Result<Option<String>> {
    let raw = get_secret(client, secret_arn).await?;
    Ok(admin_key_from_secret(&raw))
}

/// Interpret a secret string as either a bare key or `{"admin_key": ...}`.
pub fn admin_key_from_secret(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let key = match serde_json::from_str::<AdminKeySecret>(trimmed) {
        Ok(secret) => secret.admin_key,
        Err(_) => trimmed.to_string(),
    };
    Some(key).filter(|k| !k.is_empty())
}
