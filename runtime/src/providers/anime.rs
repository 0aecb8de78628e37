// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! AnimeFLV-style anime catalog.
//!
//! Search pages are server-rendered. Series pages build their episode list
//! from script, and episode pages carry their player list as a
//! `var videos = {...};` manifest, so both are rendered in a browser.

use super::{check_name_id, normalize_episodes, page_url, Provider};
use crate::acquisition::fetcher::{FetchMode, PageFetcher};
use crate::acquisition::url::resolve_optional;
use crate::error::{Result, ScrapeError};
use crate::extraction::fields::{extract_all, extract_document, FieldRule, Transform};
use crate::extraction::script_data::{
    find_marked_literal, inline_scripts, map_tracks, TrackMapping, TrackOwner,
};
use crate::model::{Series, SeriesDetails, SourceType, VideoEpisode};
use crate::renderer::SettleCondition;
use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, warn};
use url::Url;

const SEARCH_CARD_SELECTOR: &str = ".ListAnimes .Anime";

const SEARCH_CARD: &[FieldRule] = &[
    FieldRule::text("name", "h3.Title"),
    FieldRule::attr("name_id", "a", "href").with_transforms(&[Transform::LastPathSegment]),
    FieldRule::attr("image_url", "figure img", "src"),
];

const PROFILE_IMAGE: &str = "div.AnimeCover div.Image figure img";

const DETAILS: &[FieldRule] = &[
    FieldRule::text("name", "div.Ficha.fchlt div.Container h1.Title"),
    FieldRule::text("synopsis", "div.Description p"),
    FieldRule::text("status", "p.AnmStts"),
    FieldRule::attr("profile_image_url", PROFILE_IMAGE, "src"),
    FieldRule::attr("cover_image_url", PROFILE_IMAGE, "src")
        .with_transforms(&[Transform::Replace("covers", "banners")]),
];

const EPISODE_ITEM_SELECTOR: &str = "ul.ListCaps li";
/// Placeholder card announcing the next episode.
const EPISODE_EXCLUDE: &str = "li.Next";

const EPISODE_ROW: &[FieldRule] = &[
    FieldRule::text("title", "a h3.Title"),
    FieldRule::attr("episode_id", "a", "href")
        .with_transforms(&[Transform::TrailingNumber])
        .numeric(0),
];

const VIDEOS_MARKER: &str = "var videos =";

const VIDEO_TRACKS: TrackMapping = TrackMapping {
    sub_key: "SUB",
    url_keys: &["url", "code"],
    name_key: "title",
};

/// Provider for the anime catalog.
pub struct AnimeProvider {
    base_url: Url,
    fetcher: PageFetcher,
}

impl AnimeProvider {
    pub fn new(base_url: Url, fetcher: PageFetcher) -> Self {
        Self { base_url, fetcher }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<Series>> {
        let mut url = page_url(&self.base_url, &["browse"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", "1");
        let html = self.fetcher.fetch(url.as_str(), FetchMode::Static).await?;
        Ok(parse_search(&html, &self.base_url))
    }
}

#[async_trait]
impl Provider for AnimeProvider {
    fn source_type(&self) -> SourceType {
        SourceType::Anime
    }

    async fn search_series(&self, query: &str) -> Vec<Series> {
        match self.try_search(query).await {
            Ok(series) => {
                debug!(query, results = series.len(), "anime search");
                series
            }
            Err(e) => {
                warn!(query, "anime search failed: {e}");
                Vec::new()
            }
        }
    }

    async fn get_series_details(&self, name_id: &str) -> Result<SeriesDetails> {
        let name_id = check_name_id(name_id)?;
        let url = page_url(&self.base_url, &["anime", name_id])?;
        let html = self
            .fetcher
            .fetch(
                url.as_str(),
                FetchMode::Rendered(SettleCondition::NETWORK_IDLE),
            )
            .await?;
        parse_details(&html, name_id, &self.base_url)
    }

    async fn get_video_servers(&self, name_id: &str, episode_id: u32) -> Result<Vec<VideoEpisode>> {
        let name_id = check_name_id(name_id)?;
        let episode_slug = format!("{name_id}-{episode_id}");
        let url = page_url(&self.base_url, &["ver", episode_slug.as_str()])?;
        let html = self
            .fetcher
            .fetch(
                url.as_str(),
                FetchMode::Rendered(SettleCondition::NETWORK_IDLE),
            )
            .await?;
        parse_video_servers(&html, name_id, episode_id, &self.base_url)
    }
}

fn parse_search(html: &str, base: &Url) -> Vec<Series> {
    let document = Html::parse_document(html);
    extract_all(&document, SEARCH_CARD_SELECTOR, None, SEARCH_CARD)
        .into_iter()
        .filter_map(|card| {
            let name_id = card.text("name_id");
            if name_id.is_empty() {
                return None;
            }
            Some(Series {
                name: card.text("name"),
                name_id,
                image_url: resolve_optional(&card.text("image_url"), base),
                source_type: SourceType::Anime,
            })
        })
        .collect()
}

fn parse_details(html: &str, name_id: &str, base: &Url) -> Result<SeriesDetails> {
    let document = Html::parse_document(html);
    let fields = extract_document(&document, DETAILS);

    let name = fields.text("name");
    if name.is_empty() {
        return Err(ScrapeError::NotFound(format!("anime `{name_id}`")));
    }

    let rows = extract_all(
        &document,
        EPISODE_ITEM_SELECTOR,
        Some(EPISODE_EXCLUDE),
        EPISODE_ROW,
    );
    let episodes = normalize_episodes(
        &rows,
        "episode_id",
        |row, id| {
            let title = row.text("title");
            let title = if title.is_empty() { name.clone() } else { title };
            format!("{title} - {id}")
        },
        name_id,
        SourceType::Anime,
    );

    Ok(SeriesDetails::new(
        SourceType::Anime,
        name,
        name_id.to_string(),
        fields.text("synopsis"),
        fields.text("status"),
        resolve_optional(&fields.text("profile_image_url"), base),
        resolve_optional(&fields.text("cover_image_url"), base),
        episodes,
    ))
}

fn parse_video_servers(
    html: &str,
    name_id: &str,
    episode_id: u32,
    base: &Url,
) -> Result<Vec<VideoEpisode>> {
    let scripts = inline_scripts(html);
    let manifest = find_marked_literal(&scripts, VIDEOS_MARKER)?;
    map_tracks(
        &manifest,
        &VIDEO_TRACKS,
        TrackOwner {
            source_type: SourceType::Anime,
            name_id,
            episode_id,
            base_url: base,
        },
    )
}
