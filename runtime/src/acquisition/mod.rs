// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Getting provider pages as HTML.
//!
//! Server-rendered pages come straight from the HTTP client; pages whose
//! content is assembled by script go through a browser session. The
//! [`fetcher::PageFetcher`] picks one per operation.

pub mod fetcher;
pub mod http_client;
pub mod url;
