//! Storage key derivation.
//!
//! Keys follow `{namespace}/{domain}_{yyyyMMdd_HHmmss}.txt` — collision
//! avoidant but not collision-proof across sub-second repeats of the same
//! domain.

use chrono::{DateTime, Utc};
use url::Url;

/// Derive a storage key for content fetched from `url`.
pub fn derive_key(namespace: &str, url: &str, now: DateTime<Utc>) -> String {
    let domain = domain_for(url);
    let timestamp = now.format("%Y%m%d_%H%M%S");
    format!("{namespace}/{domain}_{timestamp}.txt")
}

/// The URL's host with a `www.` prefix stripped; falls back to a sanitized
/// path (or the raw string) when no host is present.
fn domain_for(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.trim_start_matches("www.").to_string(),
            None => parsed.path().trim_matches('/').replace('/', "_"),
        },
        Err(_) => url.replace(['/', ':'], "_"),
    }
}
