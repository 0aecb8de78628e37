// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chromium-based renderer using chromiumoxide.

use super::{
    wait_for_network_idle, Launcher, RenderContext, RequestEvent, Renderer, SettleCondition,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::Page;
use futures::{future, stream, StreamExt};
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// Find the Chromium binary path.
pub fn find_chromium(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    // 1. Explicit configuration
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.clone());
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches a fresh headless Chromium per session.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    chromium_path: Option<PathBuf>,
    headless: bool,
}

impl ChromiumLauncher {
    pub fn new(chromium_path: Option<PathBuf>, headless: bool) -> Self {
        Self {
            chromium_path,
            headless,
        }
    }

    fn config(&self) -> Result<BrowserConfig> {
        let chrome_path = find_chromium(self.chromium_path.as_ref())
            .context("Chromium not found. Set SERIESHUB_CHROMIUM_PATH or install chromium.")?;

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);
        builder = if self.headless {
            builder.arg("--headless=new")
        } else {
            builder.with_head()
        };

        // Sandboxing is unavailable in most containers.
        builder
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-extensions")
            .arg("--disable-application-cache")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))
    }
}

#[async_trait]
impl Launcher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn Renderer>> {
        let config = self.config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Drive the CDP connection until the browser goes away.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumRenderer { browser, handler }))
    }
}

/// A running Chromium instance.
pub struct ChromiumRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        Ok(Box::new(ChromiumContext { page }))
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        let closed = this.browser.close().await.context("failed to close browser");
        let _ = this.browser.wait().await;
        this.handler.abort();
        closed.map(|_| ())
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, settle: SettleCondition) -> Result<()> {
        // Subscribe before navigating so no request of the load is missed.
        let started = self
            .page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .context("failed to watch requests")?;
        let finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .context("failed to watch responses")?;
        let failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .context("failed to watch failures")?;

        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigation to {url} failed"))?;

        // A redirect hop re-announces the same request id; only the first
        // announcement opens a request.
        let started = started.filter_map(|e| {
            future::ready(
                e.redirect_response
                    .is_none()
                    .then(|| RequestEvent::Started(e.request_id.inner().clone())),
            )
        });
        let finished = finished.map(|e| RequestEvent::Finished(e.request_id.inner().clone()));
        let failed = failed.map(|e| RequestEvent::Finished(e.request_id.inner().clone()));
        let events = stream::select(started, stream::select(finished, failed));
        wait_for_network_idle(Box::pin(events), settle).await;
        Ok(())
    }

    async fn get_html(&self) -> Result<String> {
        self.page.content().await.context("failed to get HTML")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await.context("failed to close page")
    }
}
