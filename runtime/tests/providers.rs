// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Provider behavior end to end: static pages come from a mock HTTP
//! server, rendered pages from a fixture browser engine.

mod common;

use common::*;
use serieshub::acquisition::url::is_absolute;
use serieshub::{Config, ProviderRegistry, ScrapeError, SeriesDetails, SourceType};
use std::collections::HashSet;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANIME_BASE: &str = "https://anime.test";
const DONGHUA_BASE: &str = "https://donghua.test";

fn config(anime: &str, donghua: &str) -> Config {
    Config {
        anime_base_url: anime.parse().unwrap(),
        donghua_base_url: donghua.parse().unwrap(),
        http_timeout_ms: 2_000,
        navigation_timeout_ms: 2_000,
        ..Config::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn assert_well_formed(d: &SeriesDetails) {
    let ids: Vec<u32> = d.episodes.iter().map(|e| e.episode_id).collect();
    let unique: HashSet<u32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate episode ids: {ids:?}");
    assert!(ids.iter().all(|&id| id != 0));
    assert!(ids.windows(2).all(|w| w[0] > w[1]), "not newest first: {ids:?}");
    assert_eq!(d.last_episode, ids.first().copied().unwrap_or(0));
    assert!(d.episodes.iter().all(|e| e.name_id == d.name_id));
    for url in [&d.profile_image_url, &d.cover_image_url].into_iter().flatten() {
        assert!(is_absolute(url), "relative image url {url}");
    }
}

#[tokio::test]
async fn test_anime_search_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse"))
        .and(query_param("q", "one piece"))
        .and(query_param("page", "1"))
        .respond_with(html(ANIME_SEARCH_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let launcher = FixtureLauncher::default();
    let registry = ProviderRegistry::with_launcher(
        &config(&server.uri(), DONGHUA_BASE),
        Arc::new(launcher.clone()),
    );

    let series = registry.search_series("anime", "one piece").await.unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].name_id, "one-piece-tv");
    assert_eq!(
        series[0].image_url,
        Some(format!("{}/uploads/animes/covers/9.jpg", server.uri()))
    );
    assert_eq!(
        series[1].image_url.as_deref(),
        Some("https://cdn.example.net/red.jpg")
    );
    assert!(series.iter().all(|s| s.source_type == SourceType::Anime));
    // Search pages are static.
    assert_eq!(launcher.stats.launches(), 0);
}

#[tokio::test]
async fn test_search_absorbs_site_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let registry = ProviderRegistry::with_launcher(
        &config(&server.uri(), &server.uri()),
        Arc::new(FixtureLauncher::default()),
    );
    assert!(registry.search_series("anime", "x").await.unwrap().is_empty());
    assert!(registry.search_series("donghua", "x").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_anime_details_and_videos_rendered() {
    let launcher = FixtureLauncher::new(&[
        ("https://anime.test/anime/one-piece-tv", ANIME_DETAILS_HTML),
        ("https://anime.test/ver/one-piece-tv-1100", ANIME_EPISODE_HTML),
    ]);
    let registry = ProviderRegistry::with_launcher(
        &config(ANIME_BASE, DONGHUA_BASE),
        Arc::new(launcher.clone()),
    );

    let details = registry
        .get_series_details("anime", "one-piece-tv")
        .await
        .unwrap();
    assert_eq!(details.name, "One Piece");
    assert_eq!(details.last_episode, 1100);
    assert_eq!(details.episodes.len(), 3);
    assert_eq!(details.episodes[0].title, "One Piece - 1100");
    assert_eq!(
        details.cover_image_url.as_deref(),
        Some("https://anime.test/uploads/animes/banners/9.jpg")
    );
    assert_well_formed(&details);

    let videos = registry
        .get_video_servers("anime", "one-piece-tv", 1100)
        .await
        .unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].video_url, "https://mega.nz/embed/x1");
    assert_eq!(videos[1].video_url, "https://ok.ru/videoembed/55");
    assert_eq!(videos[1].server_name, "Okru");
    assert!(videos
        .iter()
        .all(|v| v.episode_id == 1100 && !v.video_direct && is_absolute(&v.video_url)));

    // One engine per rendered operation, each torn down.
    assert_eq!(launcher.stats.launches(), 2);
    assert_eq!(launcher.stats.shutdowns(), 2);
}

#[tokio::test]
async fn test_anime_navigation_failure_is_unavailable() {
    let launcher = FixtureLauncher::new(&[]);
    let registry = ProviderRegistry::with_launcher(
        &config(ANIME_BASE, DONGHUA_BASE),
        Arc::new(launcher.clone()),
    );

    let err = registry
        .get_video_servers("anime", "one-piece-tv", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::ProviderUnavailable(_)));
    assert_eq!(launcher.stats.shutdowns(), 1);
}

#[tokio::test]
async fn test_donghua_search_and_details_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busquedas/soul"))
        .respond_with(html(DONGHUA_SEARCH_HTML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/soul-land-2/"))
        .respond_with(html(DONGHUA_DETAILS_HTML))
        .mount(&server)
        .await;

    let registry = ProviderRegistry::with_launcher(
        &config(ANIME_BASE, &server.uri()),
        Arc::new(FixtureLauncher::default()),
    );

    let series = registry.search_series("donghua", "soul").await.unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].name_id, "soul-land-2");
    assert_eq!(series[0].source_type, SourceType::Donghua);

    let details = registry
        .get_series_details("donghua", "soul-land-2")
        .await
        .unwrap();
    assert_eq!(details.name, "Soul Land 2");
    assert_eq!(details.status, "En emisión");
    assert_eq!(
        details.profile_image_url,
        Some(format!("{}/assets/img/serie/banner/sl2.jpg", server.uri()))
    );
    // The link back to the series page is not read as episode 2.
    assert_eq!(details.last_episode, 2);
    assert_eq!(details.episodes.len(), 2);
    assert_eq!(details.episodes[0].title, "Soul Land 2 - 2");
    assert_well_formed(&details);
}

#[tokio::test]
async fn test_donghua_missing_series_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let registry = ProviderRegistry::with_launcher(
        &config(ANIME_BASE, &server.uri()),
        Arc::new(FixtureLauncher::default()),
    );
    let err = registry
        .get_series_details("donghua", "no-such-show")
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::NotFound(_)));
}

#[tokio::test]
async fn test_donghua_videos_from_iframes() {
    let launcher = FixtureLauncher::new(&[(
        "https://donghua.test/soul-land-2-episodio-2/",
        DONGHUA_EPISODE_HTML,
    )]);
    let registry = ProviderRegistry::with_launcher(
        &config(ANIME_BASE, DONGHUA_BASE),
        Arc::new(launcher.clone()),
    );

    let videos = registry
        .get_video_servers("donghua", "soul-land-2", 2)
        .await
        .unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].video_url, "https://ok.ru/videoembed/91");
    assert_eq!(videos[0].server_name, "ok.ru");
    assert_eq!(videos[0].source_type, SourceType::Donghua);
    assert_eq!(launcher.stats.shutdowns(), 1);
}

#[tokio::test]
async fn test_unknown_source_type_rejected_before_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(ANIME_SEARCH_HTML))
        .expect(0)
        .mount(&server)
        .await;

    let launcher = FixtureLauncher::default();
    let registry = ProviderRegistry::with_launcher(
        &config(&server.uri(), &server.uri()),
        Arc::new(launcher.clone()),
    );

    for result in [
        registry.search_series("klingon", "x").await.map(|_| ()),
        registry.get_series_details("klingon", "x").await.map(|_| ()),
        registry.get_video_servers("klingon", "x", 1).await.map(|_| ()),
    ] {
        assert_eq!(
            result.unwrap_err(),
            ScrapeError::UnsupportedProviderType("klingon".into())
        );
    }
    assert_eq!(launcher.stats.launches(), 0);
}
