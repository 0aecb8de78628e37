// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Async HTTP client wrapping reqwest.
//!
//! Used for provider pages that render server-side and need no browser.
//! Handles redirects, timeouts, retry on 5xx and backoff on 429.

use crate::error::{Result, ScrapeError};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Retries after the first attempt.
const MAX_RETRIES: u32 = 2;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// HTTP client for static page fetches.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with a Chrome user-agent.
    pub fn new(timeout_ms: u64) -> Self {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// GET `url` and return the body of a successful response.
    ///
    /// 404 maps to [`ScrapeError::NotFound`]; any other non-success status,
    /// transport error or timeout maps to [`ScrapeError::ProviderUnavailable`].
    ///
    /// Errors name the URL that answered, which differs from `url` after a
    /// redirect.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.get(url).await?;
        if resp.final_url != url {
            debug!(url, final_url = %resp.final_url, "redirected");
        }
        let answered = &resp.final_url;
        match resp.status {
            200..=299 => Ok(resp.body),
            404 => Err(ScrapeError::NotFound(format!("{answered} returned 404"))),
            status => Err(ScrapeError::ProviderUnavailable(format!(
                "{answered} returned HTTP {status}"
            ))),
        }
    }

    /// Perform a single GET request with retry on 5xx and backoff on 429.
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        let mut retries = 0u32;

        loop {
            debug!(url, attempt = retries + 1, "GET");
            let resp = self.client.get(url).timeout(self.timeout).send().await;

            match resp {
                Ok(r) => {
                    let status = r.status().as_u16();

                    // Retry on 5xx
                    if status >= 500 && retries < MAX_RETRIES {
                        retries += 1;
                        tokio::time::sleep(backoff(retries)).await;
                        continue;
                    }

                    // Backoff on 429
                    if status == 429 && retries < MAX_RETRIES {
                        retries += 1;
                        let retry_after = r
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        tokio::time::sleep(Duration::from_secs(retry_after.min(10))).await;
                        continue;
                    }

                    let final_url = r.url().to_string();
                    let body = r.text().await?;

                    return Ok(HttpResponse {
                        final_url,
                        status,
                        body,
                    });
                }
                Err(e) => {
                    if retries < MAX_RETRIES {
                        retries += 1;
                        tokio::time::sleep(backoff(retries)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(250 * 2u64.pow(attempt - 1))
}
