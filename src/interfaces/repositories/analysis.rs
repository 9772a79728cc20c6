use actix_web::web::Bytes;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::sneaker::SneakerAnalysis;

#[automock]
#[async_trait]
pub trait SneakerAnalyzer: Send + Sync {
    async fn analyze(&self, image: Bytes, mime_type: &str) -> anyhow::Result<SneakerAnalysis>;
}
