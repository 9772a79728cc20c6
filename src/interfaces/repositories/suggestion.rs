use async_trait::async_trait;
use mockall::automock;

use crate::entities::{
    outfit::SuggestionSet, sneaker::SneakerAnalysis, trend::TrendItem, wardrobe::WardrobeItem,
};

#[automock]
#[async_trait]
pub trait OutfitSuggester: Send + Sync {
    /// Proposes outfits for a sneaker. An `Err` covers both transport failures
    /// and answers that do not have the expected shape.
    async fn suggest(
        &self,
        analysis: &SneakerAnalysis,
        trends: &[TrendItem],
        wardrobe: &[WardrobeItem],
    ) -> anyhow::Result<SuggestionSet>;
}
