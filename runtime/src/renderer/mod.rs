// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Launcher`, `Renderer` and `RenderContext` traits that
//! abstract over the browser engine (currently Chromium via chromiumoxide),
//! and the [`session::BrowserSession`] that owns one launched engine for the
//! duration of a single provider operation.

pub mod chromium;
pub mod session;

use anyhow::Result;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

/// When a navigation counts as rendered.
///
/// The page is considered settled once at most `max_inflight` network
/// requests have been outstanding for `quiet_ms` without interruption.
/// This approximates "fully rendered"; callers bound it with a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleCondition {
    pub max_inflight: usize,
    pub quiet_ms: u64,
}

impl SettleCondition {
    /// No requests in flight for 500 ms.
    pub const NETWORK_IDLE: Self = Self {
        max_inflight: 0,
        quiet_ms: 500,
    };
    /// At most two requests in flight for 500 ms.
    pub const NETWORK_ALMOST_IDLE: Self = Self {
        max_inflight: 2,
        quiet_ms: 500,
    };
}

/// Starts a browser engine.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Renderer>>;
}

/// A launched browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(self: Box<Self>) -> Result<()>;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL and wait until the page settles.
    async fn navigate(&mut self, url: &str, settle: SettleCondition) -> Result<()>;
    /// Get the full rendered HTML.
    async fn get_html(&self) -> Result<String>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A network lifecycle event of the page being rendered, keyed by request id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEvent {
    /// A request was issued. Redirect hops reuse the id of the original request.
    Started(String),
    /// A request finished loading or failed.
    Finished(String),
}

/// Wait until the set of in-flight requests settles.
///
/// A request is in flight from its first `Started` until its `Finished`;
/// repeated `Started` events for one id (redirect hops) count once, and a
/// `Finished` for an unknown id is ignored. Returns once at most
/// `settle.max_inflight` requests have been open for the quiet window, or
/// when the stream ends. Never returns while the network stays busy; wrap
/// it in a timeout.
pub async fn wait_for_network_idle<S>(events: S, settle: SettleCondition)
where
    S: Stream<Item = RequestEvent> + Unpin,
{
    let mut events = events;
    let quiet = Duration::from_millis(settle.quiet_ms);
    let mut inflight: HashSet<String> = HashSet::new();
    let mut idle_deadline = Some(Instant::now() + quiet);

    loop {
        let next = match idle_deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, events.next()).await {
                Ok(event) => event,
                Err(_) => return,
            },
            None => events.next().await,
        };
        let Some(event) = next else {
            return;
        };

        match event {
            RequestEvent::Started(id) => {
                inflight.insert(id);
            }
            RequestEvent::Finished(id) => {
                inflight.remove(&id);
            }
        }
        let idle = inflight.len() <= settle.max_inflight;
        match (idle, idle_deadline) {
            (true, None) => idle_deadline = Some(Instant::now() + quiet),
            (false, _) => idle_deadline = None,
            (true, Some(_)) => {}
        }
    }
}
