// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Unified error taxonomy for every provider operation.
//!
//! Lower-level faults (HTTP transport, browser protocol, JSON parsing,
//! timeouts) are translated into one of four kinds at the fetcher, renderer
//! and parser boundaries. Nothing raw crosses a provider boundary.

/// Errors surfaced by providers and the dispatcher.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// The source-type discriminator is not recognized.
    #[error("unsupported provider type: {0}")]
    UnsupportedProviderType(String),

    /// The page was reached but the entity's identity fields are absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network, navigation or timeout fault reaching the source site.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The page rendered but an expected embedded structure was absent or malformed.
    #[error("parse failure: {0}")]
    ParseFailure(String),
}

impl ScrapeError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedProviderType(_) => "E_UNSUPPORTED_PROVIDER",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::ProviderUnavailable(_) => "E_PROVIDER_UNAVAILABLE",
            Self::ParseFailure(_) => "E_PARSE_FAILURE",
        }
    }
}

/// Transport faults: connect, timeout, redirect loop, body read.
impl From<reqwest::Error> for ScrapeError {
    fn from(e: reqwest::Error) -> Self {
        Self::ProviderUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseFailure(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScrapeError>;
