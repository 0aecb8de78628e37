// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Resolve scraped URL strings against a provider's base URL.
//!
//! Handles absolute URLs (returned unchanged), protocol-relative URLs
//! (`//cdn.host/x`, given the base scheme) and path-relative URLs
//! (joined against the base origin). Every image and video URL leaving a
//! provider goes through [`resolve`].

use url::Url;

/// Resolve `raw` against `base`.
///
/// Empty input stays empty so that "absent" is never disguised as a
/// link to the provider's homepage.
pub fn resolve(raw: &str, base: &Url) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    // Protocol-relative
    if raw.starts_with("//") {
        return format!("{}:{raw}", base.scheme());
    }

    // Already absolute
    if is_absolute(raw) {
        return raw.to_string();
    }

    let origin = base.origin().ascii_serialization();
    match Url::parse(&format!("{origin}/")).and_then(|o| o.join(raw)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => format!("{origin}/{}", raw.trim_start_matches('/')),
    }
}

/// Resolve an optional link, `None` when the page provides nothing.
pub fn resolve_optional(raw: &str, base: &Url) -> Option<String> {
    let resolved = resolve(raw, base);
    (!resolved.is_empty()).then_some(resolved)
}

/// Whether `s` is an absolute `http(s)` URL with a host.
pub fn is_absolute(s: &str) -> bool {
    match Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

/// Host part of an absolute URL, without a leading `www.`.
pub fn host_of(s: &str) -> Option<String> {
    let parsed = Url::parse(s).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_start_matches("www.").to_string())
}
