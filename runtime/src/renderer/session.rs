// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operation-scoped browser session.
//!
//! A [`BrowserSession`] moves through `Closed -> Starting -> Ready -> Closed`.
//! The engine is launched lazily on the first [`BrowserSession::render`],
//! rendering takes `&mut self` so only one navigation is ever in flight, and
//! teardown happens on every exit path: callers `close()` explicitly, and
//! dropping an open session (for example when the owning future is
//! cancelled) marks it closed and shuts the engine down in the background.

use super::{Launcher, RenderContext, Renderer, SettleCondition};
use crate::error::{Result, ScrapeError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Lifecycle state of a [`BrowserSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Starting,
    Ready,
}

/// Shared view of a session's state, observable after the session is gone.
#[derive(Debug, Clone)]
pub struct StateHandle(Arc<Mutex<SessionState>>);

impl StateHandle {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(SessionState::Closed)))
    }

    pub fn get(&self) -> SessionState {
        match self.0.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set(&self, state: SessionState) {
        match self.0.lock() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }
}

/// A headless browser owned by exactly one provider operation.
pub struct BrowserSession {
    launcher: Arc<dyn Launcher>,
    renderer: Option<Box<dyn Renderer>>,
    state: StateHandle,
    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Create a closed session. Nothing is launched until the first render.
    pub fn new(launcher: Arc<dyn Launcher>, navigation_timeout: Duration) -> Self {
        Self {
            launcher,
            renderer: None,
            state: StateHandle::new(),
            navigation_timeout,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn state_handle(&self) -> StateHandle {
        self.state.clone()
    }

    /// Navigate to `url`, wait for the page to settle and return its HTML.
    ///
    /// Launch, navigation and settle share one timeout. Any fault or timeout
    /// is a [`ScrapeError::ProviderUnavailable`]; the tab is closed either way
    /// but the session stays open until [`close`](Self::close).
    pub async fn render(&mut self, url: &str, settle: SettleCondition) -> Result<String> {
        let timeout = self.navigation_timeout;
        let rendered = tokio::time::timeout(timeout, self.render_inner(url, settle)).await;
        match rendered {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::ProviderUnavailable(format!(
                "rendering {url} timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }

    async fn render_inner(&mut self, url: &str, settle: SettleCondition) -> Result<String> {
        let renderer = self.ensure_started().await?;
        let mut ctx = renderer
            .new_context()
            .await
            .map_err(|e| unavailable("failed to open tab", e))?;

        debug!(url, "navigating");
        let loaded = load(ctx.as_mut(), url, settle).await;
        if let Err(e) = ctx.close().await {
            warn!(url, "failed to close tab: {e:#}");
        }
        loaded.map_err(|e| unavailable(&format!("navigation to {url} failed"), e))
    }

    async fn ensure_started(&mut self) -> Result<&dyn Renderer> {
        if self.renderer.is_none() {
            self.state.set(SessionState::Starting);
            debug!("launching browser");
            match self.launcher.launch().await {
                Ok(renderer) => {
                    self.renderer = Some(renderer);
                    self.state.set(SessionState::Ready);
                }
                Err(e) => {
                    self.state.set(SessionState::Closed);
                    return Err(unavailable("failed to launch browser", e));
                }
            }
        }
        self.renderer
            .as_deref()
            .ok_or_else(|| ScrapeError::ProviderUnavailable("browser not running".into()))
    }

    /// Shut the engine down. Safe to call on a session that never started.
    pub async fn close(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            match tokio::time::timeout(self.navigation_timeout, renderer.shutdown()).await {
                Ok(Ok(())) => debug!("browser closed"),
                Ok(Err(e)) => warn!("browser shutdown failed: {e:#}"),
                Err(_) => warn!("browser shutdown timed out"),
            }
        }
        self.state.set(SessionState::Closed);
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            debug!("browser session dropped while open, shutting down in background");
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = renderer.shutdown().await {
                        warn!("background browser shutdown failed: {e:#}");
                    }
                });
            }
        }
        self.state.set(SessionState::Closed);
    }
}

async fn load(ctx: &mut dyn RenderContext, url: &str, settle: SettleCondition) -> anyhow::Result<String> {
    ctx.navigate(url, settle).await?;
    ctx.get_html().await
}

fn unavailable(what: &str, e: anyhow::Error) -> ScrapeError {
    ScrapeError::ProviderUnavailable(format!("{what}: {e:#}"))
}
