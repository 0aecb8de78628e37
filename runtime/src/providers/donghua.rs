// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! SeriesDonghua-style donghua catalog.
//!
//! Search and series pages are server-rendered. Episode pages write their
//! players as iframe markup from inline scripts once loaded, so they are
//! rendered and the scripts scanned for iframe sources.

use super::{check_name_id, normalize_episodes, page_url, Provider};
use crate::acquisition::fetcher::{FetchMode, PageFetcher};
use crate::acquisition::url::{host_of, resolve, resolve_optional};
use crate::error::{Result, ScrapeError};
use crate::extraction::fields::{extract_all, extract_document, FieldRule, Transform};
use crate::extraction::script_data::{iframe_sources, inline_scripts};
use crate::model::{Series, SeriesDetails, SourceType, VideoEpisode};
use crate::renderer::SettleCondition;
use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, warn};
use url::Url;

const SEARCH_CARD_SELECTOR: &str = "a.angled-img";

const SEARCH_CARD: &[FieldRule] = &[
    FieldRule::text("name", "h5.sf.fc-dark.f-bold.fs-14"),
    FieldRule::own_attr("name_id", "href").with_transforms(&[Transform::LastPathSegment]),
    FieldRule::attr("image_url", "img", "src"),
];

const DETAILS: &[FieldRule] = &[
    FieldRule::text("name", "div.sf.fc-dark.ls-title-serie"),
    FieldRule::text("synopsis", "div.text-justify.fc-dark p"),
    FieldRule::text(
        "status",
        "div.col-md-6.col-xs-6.align-center.bg-white p span.badge.bg-default",
    ),
    FieldRule::attr("profile_image_url", "div.banner-side-serie", "style")
        .with_transforms(&[Transform::CssUrl]),
    FieldRule::attr("cover_image_url", "div.image", "style").with_transforms(&[Transform::CssUrl]),
];

/// Episode pages are `/{name_id}-episodio-{n}/`.
const EPISODE_MARKER: &str = "-episodio-";

const EPISODE_ITEM_SELECTOR: &str = "ul.donghua-list a";

const EPISODE_ROW: &[FieldRule] = &[
    FieldRule::text("title", "blockquote.message.sf.fc-dark.f-bold.fs-16"),
    FieldRule::own_attr("episode_id", "href")
        .with_transforms(&[Transform::NumberAfter(EPISODE_MARKER)])
        .numeric(0),
];

/// Server name used when an embed URL has no recognizable host.
const FALLBACK_SERVER_NAME: &str = "Dynamic Server";

/// Provider for the donghua catalog.
pub struct DonghuaProvider {
    base_url: Url,
    fetcher: PageFetcher,
}

impl DonghuaProvider {
    pub fn new(base_url: Url, fetcher: PageFetcher) -> Self {
        Self { base_url, fetcher }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<Series>> {
        let url = page_url(&self.base_url, &["busquedas", query])?;
        let html = self.fetcher.fetch(url.as_str(), FetchMode::Static).await?;
        Ok(parse_search(&html, &self.base_url))
    }
}

#[async_trait]
impl Provider for DonghuaProvider {
    fn source_type(&self) -> SourceType {
        SourceType::Donghua
    }

    async fn search_series(&self, query: &str) -> Vec<Series> {
        match self.try_search(query).await {
            Ok(series) => {
                debug!(query, results = series.len(), "donghua search");
                series
            }
            Err(e) => {
                warn!(query, "donghua search failed: {e}");
                Vec::new()
            }
        }
    }

    async fn get_series_details(&self, name_id: &str) -> Result<SeriesDetails> {
        let name_id = check_name_id(name_id)?;
        let url = page_url(&self.base_url, &[name_id, ""])?;
        let html = self.fetcher.fetch(url.as_str(), FetchMode::Static).await?;
        parse_details(&html, name_id, &self.base_url)
    }

    async fn get_video_servers(&self, name_id: &str, episode_id: u32) -> Result<Vec<VideoEpisode>> {
        let name_id = check_name_id(name_id)?;
        let episode_slug = format!("{name_id}{EPISODE_MARKER}{episode_id}");
        let url = page_url(&self.base_url, &[episode_slug.as_str(), ""])?;
        let html = self
            .fetcher
            .fetch(
                url.as_str(),
                FetchMode::Rendered(SettleCondition::NETWORK_ALMOST_IDLE),
            )
            .await?;
        Ok(parse_video_servers(&html, name_id, episode_id, &self.base_url))
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
                source_type: SourceType::Donghua,
            })
        })
        .collect()
}

fn parse_details(html: &str, name_id: &str, base: &Url) -> Result<SeriesDetails> {
    let document = Html::parse_document(html);
    let fields = extract_document(&document, DETAILS);

    let name = fields.text("name");
    if name.is_empty() {
        return Err(ScrapeError::NotFound(format!("donghua `{name_id}`")));
    }

    let rows = extract_all(&document, EPISODE_ITEM_SELECTOR, None, EPISODE_ROW);
    let episodes = normalize_episodes(
        &rows,
        "episode_id",
        |row, id| {
            let title = row.text("title");
            if title.is_empty() {
                format!("{name} - {id}")
            } else {
                title
            }
        },
        name_id,
        SourceType::Donghua,
    );

    Ok(SeriesDetails::new(
        SourceType::Donghua,
        name,
        name_id.to_string(),
        fields.text("synopsis"),
        fields.text("status"),
        resolve_optional(&fields.text("profile_image_url"), base),
        resolve_optional(&fields.text("cover_image_url"), base),
        episodes,
    ))
}

fn parse_video_servers(html: &str, name_id: &str, episode_id: u32, base: &Url) -> Vec<VideoEpisode> {
    let scripts = inline_scripts(html);
    iframe_sources(&scripts)
        .into_iter()
        .map(|src| {
            let video_url = resolve(&src, base);
            let server_name =
                host_of(&video_url).unwrap_or_else(|| FALLBACK_SERVER_NAME.to_string());
            VideoEpisode {
                name_id: name_id.to_string(),
                episode_id,
                video_url,
                video_direct: false,
                server_name,
                source_type: SourceType::Donghua,
            }
        })
        .collect()
}
