// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures: a browser engine that serves canned pages by URL.

#![allow(dead_code)]

use async_trait::async_trait;
use serieshub::renderer::{Launcher, RenderContext, Renderer, SettleCondition};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct EngineStats {
    pub launches: AtomicUsize,
    pub shutdowns: AtomicUsize,
}

impl EngineStats {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

/// Serves the registered HTML for exact URLs and fails navigation otherwise.
#[derive(Clone, Default)]
pub struct FixtureLauncher {
    pages: Arc<HashMap<String, String>>,
    pub stats: Arc<EngineStats>,
}

impl FixtureLauncher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        let pages = pages
            .iter()
            .map(|(url, html)| (url.to_string(), html.to_string()))
            .collect();
        Self {
            pages: Arc::new(pages),
            stats: Arc::new(EngineStats::default()),
        }
    }
}

#[async_trait]
impl Launcher for FixtureLauncher {
    async fn launch(&self) -> anyhow::Result<Box<dyn Renderer>> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureRenderer {
            pages: Arc::clone(&self.pages),
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct FixtureRenderer {
    pages: Arc<HashMap<String, String>>,
    stats: Arc<EngineStats>,
}

#[async_trait]
impl Renderer for FixtureRenderer {
    async fn new_context(&self) -> anyhow::Result<Box<dyn RenderContext>> {
        Ok(Box::new(FixtureTab {
            pages: Arc::clone(&self.pages),
            current: None,
        }))
    }

    async fn shutdown(self: Box<Self>) -> anyhow::Result<()> {
        self.stats.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FixtureTab {
    pages: Arc<HashMap<String, String>>,
    current: Option<String>,
}

#[async_trait]
impl RenderContext for FixtureTab {
    async fn navigate(&mut self, url: &str, _settle: SettleCondition) -> anyhow::Result<()> {
        match self.pages.get(url) {
            Some(html) => {
                self.current = Some(html.clone());
                Ok(())
            }
            None => anyhow::bail!("net::ERR_NAME_NOT_RESOLVED at {url}"),
        }
    }

    async fn get_html(&self) -> anyhow::Result<String> {
        self.current
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no document loaded"))
    }

    async fn close(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}

pub const ANIME_SEARCH_HTML: &str = r#"<html><body>
    <ul class="ListAnimes AX Rows A03 C02 D02">
      <li><article class="Anime alt B">
        <a href="/anime/one-piece-tv">
          <div class="Image fa-play-circle-o"><figure><img src="/uploads/animes/covers/9.jpg" alt="One Piece"></figure></div>
          <h3 class="Title">One Piece</h3>
        </a>
      </article></li>
      <li><article class="Anime alt B">
        <a href="/anime/one-piece-film-red">
          <div class="Image"><figure><img src="https://cdn.example.net/red.jpg"></figure></div>
          <h3 class="Title">One Piece Film: Red</h3>
        </a>
      </article></li>
    </ul></body></html>"#;

pub const ANIME_DETAILS_HTML: &str = r#"<html><body>
    <div class="Ficha fchlt"><div class="Container"><h1 class="Title">One Piece</h1></div></div>
    <div class="AnimeCover"><div class="Image"><figure><img src="/uploads/animes/covers/9.jpg"></figure></div></div>
    <p class="AnmStts">En emision</p>
    <div class="Description"><p>Luffy sets sail.</p></div>
    <ul class="ListCaps">
      <li class="Next"><a href="/anime/next"><h3 class="Title">Próximo episodio</h3></a></li>
      <li><a href="/ver/one-piece-tv-1099"><h3 class="Title">One Piece</h3></a></li>
      <li><a href="/ver/one-piece-tv-1100"><h3 class="Title">One Piece</h3></a></li>
      <li><a href="/ver/one-piece-tv-1099"><h3 class="Title">One Piece</h3></a></li>
      <li><a href="/ver/one-piece-tv-1098"><h3 class="Title">One Piece</h3></a></li>
    </ul></body></html>"#;

pub const ANIME_EPISODE_HTML: &str = r#"<html><body>
    <script>
      var videos = {"SUB":[{"server":"mega","title":"MEGA","url":"https:\/\/mega.nz\/embed\/x1","code":"ignored"},{"server":"ok","title":"Okru","code":"\/\/ok.ru\/videoembed\/55"},{"server":"none","title":"Broken"}]};
    </script></body></html>"#;

pub const DONGHUA_SEARCH_HTML: &str = r#"<html><body><div class="row">
    <div class="item"><a href="/soul-land-2/" class="angled-img">
      <div class="img"><img src="/assets/img/serie/imagen/sl2.jpg"></div>
      <h5 class="sf fc-dark f-bold fs-14">Soul Land 2</h5>
    </a></div>
    </div></body></html>"#;

pub const DONGHUA_DETAILS_HTML: &str = r#"<html><body>
    <div class="banner-side-serie" style="background-image: url('/assets/img/serie/banner/sl2.jpg')"></div>
    <div class="image" style="background-image: url(/assets/img/serie/imagen/sl2.jpg)"></div>
    <div class="sf fc-dark ls-title-serie">Soul Land 2</div>
    <div class="col-md-6 col-xs-6 align-center bg-white"><p><span class="badge bg-default">En emisión</span></p></div>
    <div class="text-justify fc-dark"><p>Tang San's legacy.</p></div>
    <ul class="donghua-list">
      <a href="/soul-land-2/"><blockquote class="message sf fc-dark f-bold fs-16">Soul Land 2</blockquote></a>
      <a href="/soul-land-2-episodio-2/"><blockquote class="message sf fc-dark f-bold fs-16">Soul Land 2 - 2</blockquote></a>
      <a href="/soul-land-2-episodio-1/"><blockquote class="message sf fc-dark f-bold fs-16">Soul Land 2 - 1</blockquote></a>
    </ul></body></html>"#;

pub const DONGHUA_EPISODE_HTML: &str = r#"<html><body>
    <script>
      var servers = ['<iframe src="https://ok.ru/videoembed/91" allowfullscreen></iframe>'];
    </script></body></html>"#;
