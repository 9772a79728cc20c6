use serde::{Deserialize, Serialize};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendItem {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub title: String,
    pub source: String,
}

/// One populated cache slot. Replaced whole, never mutated in place.
#[derive(Debug, Clone)]
pub struct TrendCacheEntry {
    pub data: Vec<TrendItem>,
    pub timestamp: Instant,
}

impl TrendCacheEntry {
    pub fn new(data: Vec<TrendItem>) -> Self {
        TrendCacheEntry {
            data,
            timestamp: Instant::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
}

/// Cache key for a brand/model pair.
pub fn trend_key(brand: &str, model: &str) -> String {
    format!("{brand}-{model}").to_lowercase()
}
