// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! `serieshub search|details|videos`: one-shot catalog lookups.

use crate::cli::output;
use crate::config::Config;
use crate::providers::registry::ProviderRegistry;
use anyhow::Result;

/// Run `serieshub search <type> <query>`.
pub async fn search(config: &Config, source_type: &str, query: &str) -> Result<()> {
    let registry = ProviderRegistry::from_config(config);
    let series = registry.search_series(source_type, query).await?;
    if series.is_empty() && !output::is_json() {
        eprintln!("  No results for '{query}'.");
    }
    output::print_json(&series);
    Ok(())
}

/// Run `serieshub details <type> <nameId>`.
pub async fn details(config: &Config, source_type: &str, name_id: &str) -> Result<()> {
    let registry = ProviderRegistry::from_config(config);
    let details = registry.get_series_details(source_type, name_id).await?;
    output::print_json(&details);
    Ok(())
}

/// Run `serieshub videos <type> <nameId> <episodeId>`.
pub async fn videos(config: &Config, source_type: &str, name_id: &str, episode_id: u32) -> Result<()> {
    let registry = ProviderRegistry::from_config(config);
    let videos = registry
        .get_video_servers(source_type, name_id, episode_id)
        .await?;
    output::print_json(&videos);
    Ok(())
}
