//! # Media search
//!
//! Videos come from the YouTube Data API, articles from GNews. Both return display-ready strings.
//! A failed search turns into a single error line instead of failing the request.
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::{
    config::{GNEWS_API_KEY, YOUTUBE_API_KEY},
    error::AppError,
    utils::google_search_url,
};

pub const YOUTUBE_SEARCH: &str = "https://www.googleapis.com/youtube/v3/search";
pub const GNEWS_SEARCH: &str = "https://gnews.io/api/v4/search";
pub const GNEWS_MAX: &str = "10";

#[derive(Deserialize)]
pub struct YoutubeSearch {
    #[serde(default)]
    pub items: Vec<YoutubeItem>,
}

#[derive(Deserialize)]
pub struct YoutubeItem {
    pub id: YoutubeId,
    pub snippet: YoutubeSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeId {
    pub video_id: Option<String>,
}

#[derive(Deserialize)]
pub struct YoutubeSnippet {
    pub title: String,
}

#[derive(Deserialize)]
pub struct GnewsSearch {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
}

pub fn format_videos(search: YoutubeSearch, limit: usize) -> Vec<String> {
    search
        .items
        .into_iter()
        .filter_map(|item| {
            item.id.video_id.map(|video_id| {
                format!(
                    "{}: https://www.youtube.com/watch?v={video_id}",
                    item.snippet.title
                )
            })
        })
        .take(limit)
        .collect()
}

pub fn format_articles(search: GnewsSearch, limit: usize) -> Vec<String> {
    search
        .articles
        .into_iter()
        .take(limit)
        .map(|article| format!("[{}]({})", article.title, article.url))
        .collect()
}

async fn search_videos(
    http: &Client,
    api_key: Option<&str>,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, AppError> {
    let api_key = api_key.ok_or(AppError::MissingKey(YOUTUBE_API_KEY))?;
    let max_results = limit.to_string();

    let search: YoutubeSearch = http
        .get(YOUTUBE_SEARCH)
        .query(&[
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("q", query),
            ("key", api_key),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(format_videos(search, limit))
}

async fn search_articles(
    http: &Client,
    api_key: Option<&str>,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, AppError> {
    let api_key = api_key.ok_or(AppError::MissingKey(GNEWS_API_KEY))?;

    let search: GnewsSearch = http
        .get(GNEWS_SEARCH)
        .query(&[("q", query), ("token", api_key), ("max", GNEWS_MAX)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(format_articles(search, limit))
}

pub async fn youtube_videos(
    http: &Client,
    api_key: Option<&str>,
    query: &str,
    limit: usize,
) -> Vec<String> {
    search_videos(http, api_key, query, limit)
        .await
        .unwrap_or_else(|e| {
            warn!("YouTube search for {query:?} failed: {e}");
            vec![format!("Error fetching YouTube videos: {e}")]
        })
}

pub async fn news_articles(
    http: &Client,
    api_key: Option<&str>,
    query: &str,
    limit: usize,
) -> Vec<String> {
    search_articles(http, api_key, query, limit)
        .await
        .unwrap_or_else(|e| {
            warn!("GNews search for {query:?} failed: {e}");
            vec![format!("Error fetching articles: {e}")]
        })
}

pub fn self_care_product(mood: &str) -> String {
    let query = format!("best self-care products for {mood} 2025");
    format!("Explore self-care options on Google: {}", google_search_url(&query))
}
