// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! SeriesHub runtime library: anime and donghua catalog scraping.
//!
//! Providers turn a site's search, series and episode pages into uniform
//! entities. Pages are fetched statically or rendered in a headless
//! browser owned by a single operation.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod providers;
pub mod renderer;
pub mod rest;

pub use config::Config;
pub use error::{Result, ScrapeError};
pub use model::{Episode, Series, SeriesDetails, SourceType, VideoEpisode};
pub use providers::registry::ProviderRegistry;
pub use providers::Provider;
