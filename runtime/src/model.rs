// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Normalized entities returned by every provider.
//!
//! All entities are plain value objects built fresh per call. Each carries
//! its [`SourceType`] because a `name_id` is only unique within one
//! provider's namespace.

use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which provider produced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Anime,
    Donghua,
}

impl SourceType {
    /// All supported source types, in dispatch order.
    pub const ALL: [SourceType; 2] = [SourceType::Anime, SourceType::Donghua];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Donghua => "donghua",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anime" => Ok(Self::Anime),
            "donghua" => Ok(Self::Donghua),
            _ => Err(ScrapeError::UnsupportedProviderType(s.to_string())),
        }
    }
}

/// A search result card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    pub name_id: String,
    /// `None` when the card has no image.
    pub image_url: Option<String>,
    pub source_type: SourceType,
}

/// One entry of a series' episode list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub title: String,
    /// Parent series.
    pub name_id: String,
    /// Never zero; unique within the series.
    pub episode_id: u32,
    pub source_type: SourceType,
}

/// Full series page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDetails {
    pub name: String,
    pub name_id: String,
    pub synopsis: String,
    pub status: String,
    pub profile_image_url: Option<String>,
    pub cover_image_url: Option<String>,
    /// Equals `episodes[0].episode_id`, or `0` when there are no episodes.
    pub last_episode: u32,
    /// Newest first.
    pub episodes: Vec<Episode>,
    pub source_type: SourceType,
}

impl SeriesDetails {
    /// Build details, deriving `last_episode` from the newest episode.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_type: SourceType,
        name: String,
        name_id: String,
        synopsis: String,
        status: String,
        profile_image_url: Option<String>,
        cover_image_url: Option<String>,
        episodes: Vec<Episode>,
    ) -> Self {
        let last_episode = episodes.first().map(|e| e.episode_id).unwrap_or(0);
        Self {
            name,
            name_id,
            synopsis,
            status,
            profile_image_url,
            cover_image_url,
            last_episode,
            episodes,
            source_type,
        }
    }
}

/// A playable source for one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEpisode {
    pub name_id: String,
    pub episode_id: u32,
    pub video_url: String,
    /// `true` for a direct media stream, `false` for an embed/player page.
    pub video_direct: bool,
    pub server_name: String,
    pub source_type: SourceType,
}
