// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Catalog providers.
//!
//! Each provider implements the same three operations against one site's
//! markup conventions. Failure policy is uniform across variants:
//!
//! - `search_series` is best-effort and absorbs every fault into an empty list.
//! - `get_series_details` and `get_video_servers` surface the specific
//!   [`ScrapeError`](crate::error::ScrapeError) kind.

pub mod anime;
pub mod donghua;
pub mod registry;

use crate::error::{Result, ScrapeError};
use crate::extraction::fields::Fields;
use crate::model::{Episode, Series, SeriesDetails, SourceType, VideoEpisode};
use async_trait::async_trait;
use url::Url;

/// The search / details / video-servers contract.
#[async_trait]
pub trait Provider: Send + Sync {
    fn source_type(&self) -> SourceType;

    /// Search the catalog. Never fails; faults yield an empty list.
    async fn search_series(&self, query: &str) -> Vec<Series>;

    /// Series page with its newest-first episode list.
    async fn get_series_details(&self, name_id: &str) -> Result<SeriesDetails>;

    /// Playable sources for one episode.
    async fn get_video_servers(&self, name_id: &str, episode_id: u32) -> Result<Vec<VideoEpisode>>;
}

/// Build `base` + path segments, percent-encoding each segment.
///
/// An empty trailing segment produces a trailing slash.
pub(crate) fn page_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ScrapeError::ProviderUnavailable(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Reject identifiers that cannot name a page.
pub(crate) fn check_name_id(name_id: &str) -> Result<&str> {
    let trimmed = name_id.trim();
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(ScrapeError::NotFound(format!("invalid series id `{name_id}`")));
    }
    Ok(trimmed)
}

/// Turn extracted episode rows into a well-formed episode list.
///
/// Rows whose id is zero are dropped, duplicate ids keep their first
/// occurrence, and the result is ordered newest (highest id) first.
pub(crate) fn normalize_episodes(
    rows: &[Fields],
    id_field: &str,
    title: impl Fn(&Fields, u32) -> String,
    name_id: &str,
    source_type: SourceType,
) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = Vec::with_capacity(rows.len());
    for row in rows {
        let episode_id = row.number(id_field);
        if episode_id == 0 || episodes.iter().any(|e| e.episode_id == episode_id) {
            continue;
        }
        episodes.push(Episode {
            title: title(row, episode_id),
            name_id: name_id.to_string(),
            episode_id,
            source_type,
        });
    }
    episodes.sort_by(|a, b| b.episode_id.cmp(&a.episode_id));
    episodes
}
