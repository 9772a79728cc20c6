use std::{collections::HashSet, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::{
    constants::MAX_TREND_ITEMS,
    entities::trend::TrendItem,
    repositories::scraper::TrendScraper,
};

const PINTEREST_SEARCH: &str = "https://www.pinterest.com/search/pins/";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid img regex"));
static SRC_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bsrc="(https://i\.pinimg\.com/[^"]+)""#).expect("valid src regex"));
static ALT_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\balt="([^"]*)""#).expect("valid alt regex"));
static SIZE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://i\.pinimg\.com/[^/]+/").expect("valid size regex"));

/// Pulls outfit pins for a sneaker from Pinterest's search page.
pub struct PinterestScraper {
    http_client: reqwest::Client,
}

impl Default for PinterestScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl PinterestScraper {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to create HTTP client for Pinterest, using default client");
                reqwest::Client::default()
            });

        PinterestScraper { http_client }
    }

    fn search_url(brand: &str, model: &str) -> Result<Url> {
        let query = format!("{} {} outfit", brand.trim(), model.trim());
        Url::parse_with_params(PINTEREST_SEARCH, &[("q", query.as_str())])
            .context("Failed to build Pinterest search URL")
    }
}

#[async_trait]
impl TrendScraper for PinterestScraper {
    async fn scrape(&self, brand: &str, model: &str) -> Result<Vec<TrendItem>> {
        let url = Self::search_url(brand, model)?;
        tracing::info!(%url, "Scraping trends");

        let response = self
            .http_client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .context("Failed to reach Pinterest")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Pinterest search failed with status {}", status));
        }

        let html = response
            .text()
            .await
            .context("Failed to read Pinterest search page")?;

        let fallback_title = format!("{} {} outfit", brand.trim(), model.trim());
        Ok(extract_pins(&html, &fallback_title, MAX_TREND_ITEMS))
    }
}

/// Extracts pin images from a search result page: deduplicated, upscaled to
/// the 736px rendition, at most `limit` items, in page order.
pub fn extract_pins(html: &str, fallback_title: &str, limit: usize) -> Vec<TrendItem> {
    let mut seen = HashSet::new();

    IMG_TAG
        .find_iter(html)
        .filter_map(|tag| {
            let tag = tag.as_str();
            let src = SRC_ATTR.captures(tag)?.get(1)?.as_str();
            let title = ALT_ATTR
                .captures(tag)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|alt| !alt.is_empty())
                .unwrap_or_else(|| fallback_title.to_string());
            Some((upscale(src), title))
        })
        .filter(|(image_url, _)| seen.insert(image_url.clone()))
        .take(limit)
        .map(|(image_url, title)| TrendItem {
            image_url,
            title,
            source: "pinterest".to_string(),
        })
        .collect()
}

fn upscale(src: &str) -> String {
    SIZE_SEGMENT
        .replace(src, "https://i.pinimg.com/736x/")
        .into_owned()
}
