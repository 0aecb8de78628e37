// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration loading and resolution.
//!
//! Every setting resolves explicit value -> environment variable -> default.
//! Unparsable environment values fall back to the default with a warning.

use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;
use url::Url;

pub const DEFAULT_ANIME_URL: &str = "https://www3.animeflv.net";
pub const DEFAULT_DONGHUA_URL: &str = "https://seriesdonghua.com";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;

/// Runtime settings shared by every provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub anime_base_url: Url,
    pub donghua_base_url: Url,
    pub http_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
    /// Chromium binary; discovered on `PATH` when unset.
    pub chromium_path: Option<PathBuf>,
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anime_base_url: Url::parse(DEFAULT_ANIME_URL).expect("default anime URL is valid"),
            donghua_base_url: Url::parse(DEFAULT_DONGHUA_URL)
                .expect("default donghua URL is valid"),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            navigation_timeout_ms: DEFAULT_NAV_TIMEOUT_MS,
            chromium_path: None,
            headless: true,
        }
    }
}

impl Config {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            anime_base_url: parse_or(&lookup, "SERIESHUB_ANIME_URL", defaults.anime_base_url),
            donghua_base_url: parse_or(
                &lookup,
                "SERIESHUB_DONGHUA_URL",
                defaults.donghua_base_url,
            ),
            http_timeout_ms: parse_or(
                &lookup,
                "SERIESHUB_HTTP_TIMEOUT_MS",
                defaults.http_timeout_ms,
            ),
            navigation_timeout_ms: parse_or(
                &lookup,
                "SERIESHUB_NAV_TIMEOUT_MS",
                defaults.navigation_timeout_ms,
            ),
            chromium_path: lookup("SERIESHUB_CHROMIUM_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            headless: lookup("SERIESHUB_HEADFUL").as_deref() != Some("1"),
        }
    }

    /// Apply explicit overrides (e.g. from CLI flags).
    pub fn with_navigation_timeout(mut self, timeout_ms: Option<u64>) -> Self {
        if let Some(ms) = timeout_ms {
            self.navigation_timeout_ms = ms;
        }
        self
    }

    pub fn with_chromium_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.chromium_path = path;
        }
        self
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(key, value = raw.as_str(), "ignoring invalid setting");
                default
            }
        },
    }
}
