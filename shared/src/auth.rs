//! Shared-secret admin authorization.

use lambda_http::http::HeaderMap;

use crate::{Error, Result};

/// Header carrying the admin secret on write requests.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Extract the presented admin key from request headers.
///
/// Header names are matched case-insensitively.
pub fn presented_admin_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Check a presented admin key against the configured secret.
///
/// A missing secret is reported as `NotConfigured` even when a header is
/// present, so a misconfigured deployment never silently accepts writes.
pub fn authorize_admin(configured: Option<&str>, presented: Option<&str>) -> Result<()> {
    let secret = configured
        .filter(|s| !s.is_empty())
        .ok_or(Error::NotConfigured)?;

    match presented {
        Some(key) if key == secret => Ok(()),
        _ => Err(Error::Unauthorized),
    }
}
