// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Source-type dispatch.
//!
//! The discriminator is validated before anything else happens: an
//! unknown source type fails with `UnsupportedProviderType` and never
//! reaches the network.

use super::anime::AnimeProvider;
use super::donghua::DonghuaProvider;
use super::Provider;
use crate::acquisition::fetcher::PageFetcher;
use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use crate::error::Result;
use crate::model::{Series, SeriesDetails, SourceType, VideoEpisode};
use crate::renderer::chromium::ChromiumLauncher;
use crate::renderer::Launcher;
use std::sync::Arc;
use std::time::Duration;

/// One provider per [`SourceType`].
pub struct ProviderRegistry {
    anime: Box<dyn Provider>,
    donghua: Box<dyn Provider>,
}

impl ProviderRegistry {
    pub fn new(anime: Box<dyn Provider>, donghua: Box<dyn Provider>) -> Self {
        Self { anime, donghua }
    }

    /// Build both providers from configuration, rendering with Chromium.
    pub fn from_config(config: &Config) -> Self {
        let launcher: Arc<dyn Launcher> = Arc::new(ChromiumLauncher::new(
            config.chromium_path.clone(),
            config.headless,
        ));
        Self::with_launcher(config, launcher)
    }

    /// Build both providers from configuration with a custom browser engine.
    pub fn with_launcher(config: &Config, launcher: Arc<dyn Launcher>) -> Self {
        let fetcher = PageFetcher::new(
            HttpClient::new(config.http_timeout_ms),
            launcher,
            Duration::from_millis(config.navigation_timeout_ms),
        );
        Self::new(
            Box::new(AnimeProvider::new(
                config.anime_base_url.clone(),
                fetcher.clone(),
            )),
            Box::new(DonghuaProvider::new(
                config.donghua_base_url.clone(),
                fetcher,
            )),
        )
    }

    /// The provider serving `source`.
    pub fn provider(&self, source: SourceType) -> &dyn Provider {
        match source {
            SourceType::Anime => self.anime.as_ref(),
            SourceType::Donghua => self.donghua.as_ref(),
        }
    }

    /// Parse the discriminator and return its provider.
    pub fn get(&self, source_type: &str) -> Result<&dyn Provider> {
        let source: SourceType = source_type.parse()?;
        Ok(self.provider(source))
    }

    pub async fn search_series(&self, source_type: &str, query: &str) -> Result<Vec<Series>> {
        Ok(self.get(source_type)?.search_series(query).await)
    }

    pub async fn get_series_details(&self, source_type: &str, name_id: &str) -> Result<SeriesDetails> {
        self.get(source_type)?.get_series_details(name_id).await
    }

    pub async fn get_video_servers(
        &self,
        source_type: &str,
        name_id: &str,
        episode_id: u32,
    ) -> Result<Vec<VideoEpisode>> {
        self.get(source_type)?
            .get_video_servers(name_id, episode_id)
            .await
    }
}
