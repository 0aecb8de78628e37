// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! `serieshub serve`: run the REST API.

use crate::config::Config;
use crate::providers::registry::ProviderRegistry;
use crate::rest;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8080;

/// Serve the REST API until the process is stopped.
pub async fn run(config: Config, port: u16) -> Result<()> {
    info!(
        anime = %config.anime_base_url,
        donghua = %config.donghua_base_url,
        nav_timeout_ms = config.navigation_timeout_ms,
        "starting SeriesHub v{}",
        env!("CARGO_PKG_VERSION")
    );
    let registry = Arc::new(ProviderRegistry::from_config(&config));
    rest::start(port, registry)
        .await
        .with_context(|| format!("REST API on port {port} failed"))
}
