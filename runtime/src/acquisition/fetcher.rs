// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-operation page acquisition.

use crate::acquisition::http_client::HttpClient;
use crate::error::Result;
use crate::renderer::session::BrowserSession;
use crate::renderer::{Launcher, SettleCondition};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How a provider operation obtains its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain HTTP GET; the markup is server-rendered.
    Static,
    /// Headless browser render, waiting for the given settle condition.
    Rendered(SettleCondition),
}

/// Fetches pages for providers, owning nothing between calls.
#[derive(Clone)]
pub struct PageFetcher {
    http: HttpClient,
    launcher: Arc<dyn Launcher>,
    navigation_timeout: Duration,
}

impl PageFetcher {
    pub fn new(http: HttpClient, launcher: Arc<dyn Launcher>, navigation_timeout: Duration) -> Self {
        Self {
            http,
            launcher,
            navigation_timeout,
        }
    }

    /// Fetch `url` as HTML.
    ///
    /// Rendered fetches open a fresh [`BrowserSession`] and close it before
    /// returning, on success and on failure alike.
    pub async fn fetch(&self, url: &str, mode: FetchMode) -> Result<String> {
        match mode {
            FetchMode::Static => {
                debug!(url, "static fetch");
                self.http.get_text(url).await
            }
            FetchMode::Rendered(settle) => {
                debug!(url, ?settle, "rendered fetch");
                let mut session =
                    BrowserSession::new(Arc::clone(&self.launcher), self.navigation_timeout);
                let html = session.render(url, settle).await;
                session.close().await;
                html
            }
        }
    }
}
