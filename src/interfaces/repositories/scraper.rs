use async_trait::async_trait;
use mockall::automock;

use crate::entities::trend::TrendItem;

#[automock]
#[async_trait]
pub trait TrendScraper: Send + Sync {
    /// Slow and unreliable: may take seconds, fail, or find nothing.
    async fn scrape(&self, brand: &str, model: &str) -> anyhow::Result<Vec<TrendItem>>;
}
