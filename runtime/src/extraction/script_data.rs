// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Playback data embedded in inline `<script>` bodies.
//!
//! Some providers never put their video sources in markup. They assign a
//! JSON-shaped literal to a script-local variable (`var videos = {...};`) or
//! write iframe markup from script. This module handles both with a narrow
//! grammar: find the marker, capture one balanced literal that ends at a
//! statement terminator, hand it to `serde_json`. No script is executed.

use crate::acquisition::url::resolve;
use crate::error::{Result, ScrapeError};
use crate::model::{SourceType, VideoEpisode};
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

/// Upper bound on a captured literal (1 MiB).
const MAX_LITERAL_LEN: usize = 1024 * 1024;

/// How a manifest's track entries map onto [`VideoEpisode`] fields.
#[derive(Debug, Clone, Copy)]
pub struct TrackMapping {
    /// Key holding the array of track entries (e.g. `SUB`).
    pub sub_key: &'static str,
    /// Entry keys holding the video URL, most preferred first.
    pub url_keys: &'static [&'static str],
    /// Entry key holding the server name.
    pub name_key: &'static str,
}

/// Identity carried into every mapped [`VideoEpisode`].
#[derive(Debug, Clone, Copy)]
pub struct TrackOwner<'a> {
    pub source_type: SourceType,
    pub name_id: &'a str,
    pub episode_id: u32,
    pub base_url: &'a Url,
}

/// Bodies of all inline scripts (those without a `src` attribute).
pub fn inline_scripts(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("script:not([src])").expect("script selector is valid");
    document
        .select(&sel)
        .map(|el| el.text().collect::<String>())
        .filter(|body| !body.trim().is_empty())
        .collect()
}

/// Find the first script containing `marker` and parse the literal after it.
///
/// Fails with [`ScrapeError::ParseFailure`] when no script carries the
/// marker, or when the literal is unbalanced, oversized, not followed by a
/// statement terminator, or not valid JSON.
pub fn find_marked_literal(scripts: &[String], marker: &str) -> Result<Value> {
    let (body, pos) = scripts
        .iter()
        .find_map(|s| s.find(marker).map(|p| (s, p)))
        .ok_or_else(|| ScrapeError::ParseFailure(format!("no script contains `{marker}`")))?;

    let after = &body[pos + marker.len()..];
    let literal = balanced_literal(after).ok_or_else(|| {
        ScrapeError::ParseFailure(format!("no balanced literal after `{marker}`"))
    })?;

    let leading_ws = after.len() - after.trim_start().len();
    let rest = &after[leading_ws + literal.len()..];
    if !ends_statement(rest) {
        return Err(ScrapeError::ParseFailure(format!(
            "literal after `{marker}` is not followed by a statement terminator"
        )));
    }

    Ok(serde_json::from_str(literal)?)
}

/// Capture the balanced `{...}` or `[...]` literal at the start of `text`.
///
/// Leading whitespace is skipped. Brackets inside single- or double-quoted
/// strings (with backslash escapes) are ignored.
pub fn balanced_literal(text: &str) -> Option<&str> {
    let offset = text.len() - text.trim_start().len();
    let body = &text[offset..];
    let open = body.chars().next()?;
    if open != '{' && open != '[' {
        return None;
    }

    let mut stack: Vec<char> = Vec::new();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if i > MAX_LITERAL_LEN {
            return None;
        }
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => in_string = Some(c),
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&body[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn ends_statement(rest: &str) -> bool {
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.is_empty() || rest.starts_with([';', '\n', '\r'])
}

/// Map the entries under `mapping.sub_key` into video episodes.
///
/// A missing sub-key means the manifest lists no sources and yields an
/// empty list. A sub-key that is present but not an array is a
/// [`ScrapeError::ParseFailure`]. Entries without any URL are skipped.
pub fn map_tracks(
    manifest: &Value,
    mapping: &TrackMapping,
    owner: TrackOwner<'_>,
) -> Result<Vec<VideoEpisode>> {
    let Some(tracks) = manifest.get(mapping.sub_key) else {
        return Ok(Vec::new());
    };
    let tracks = tracks.as_array().ok_or_else(|| {
        ScrapeError::ParseFailure(format!("`{}` is not a list of tracks", mapping.sub_key))
    })?;

    Ok(tracks
        .iter()
        .filter_map(|entry| {
            let raw_url = mapping
                .url_keys
                .iter()
                .filter_map(|k| entry.get(*k).and_then(Value::as_str))
                .find(|s| !s.trim().is_empty())?;
            let server_name = entry
                .get(mapping.name_key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(VideoEpisode {
                name_id: owner.name_id.to_string(),
                episode_id: owner.episode_id,
                video_url: resolve(raw_url, owner.base_url),
                video_direct: false,
                server_name,
                source_type: owner.source_type,
            })
        })
        .collect())
}

fn iframe_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<iframe\s[^>]*?src\s*=\s*\\?['"]?([^'"\s>\\]+)"#).expect("valid regex")
    })
}

/// Distinct iframe `src` values written from script bodies, in page order.
pub fn iframe_sources(scripts: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for body in scripts {
        for cap in iframe_regex().captures_iter(body) {
            if let Some(src) = cap.get(1) {
                let src = src.as_str().to_string();
                if !out.contains(&src) {
                    out.push(src);
                }
            }
        }
    }
    out
}
