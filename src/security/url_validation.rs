//! Download URL validation: HTTPS only.

use crate::error::PolicyViolation;

/// Parse a download URL and require the `https` scheme and a host.
pub fn validate_download_url(url_str: &str) -> Result<url::Url, PolicyViolation> {
    if !url_str.starts_with("https://") {
        return Err(PolicyViolation::InsecureUrl);
    }
    let parsed = url::Url::parse(url_str).map_err(|_| PolicyViolation::InsecureUrl)?;
    if parsed.scheme() != "https" || parsed.host_str().is_none() {
        return Err(PolicyViolation::InsecureUrl);
    }
    Ok(parsed)
}
