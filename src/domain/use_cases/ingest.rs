use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{
    constants::{ANALYSIS_TIMEOUT, MAX_OUTFIT_SUGGESTIONS, UPLOAD_MAX_ATTEMPTS, UPLOAD_RETRY_DELAY},
    entities::{
        outfit::OutfitSuggestion, sneaker::SneakerAnalysis, upload::ImageUpload,
        wardrobe::WardrobeItem,
    },
    errors::AppError,
    repositories::{
        analysis::SneakerAnalyzer,
        storage::{ImageStorage, StoredObject},
        suggestion::OutfitSuggester,
        wardrobe::WardrobeRepository,
    },
    settings::AppConfig,
    utils::{filename::sanitize_filename, retry::retry_fixed},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestPolicy {
    pub upload_attempts: u32,
    pub upload_retry_delay: Duration,
    pub analysis_timeout: Duration,
    pub max_suggestions: usize,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        IngestPolicy {
            upload_attempts: UPLOAD_MAX_ATTEMPTS,
            upload_retry_delay: UPLOAD_RETRY_DELAY,
            analysis_timeout: ANALYSIS_TIMEOUT,
            max_suggestions: MAX_OUTFIT_SUGGESTIONS,
        }
    }
}

impl From<&AppConfig> for IngestPolicy {
    fn from(config: &AppConfig) -> Self {
        IngestPolicy {
            upload_attempts: config.upload_max_attempts,
            upload_retry_delay: config.upload_retry_delay(),
            analysis_timeout: config.analysis_timeout(),
            max_suggestions: MAX_OUTFIT_SUGGESTIONS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub analysis: SneakerAnalysis,
    pub suggestions: Vec<OutfitSuggestion>,
    pub stored_image_url: String,
}

/// Turns one uploaded sneaker photo into an analysis plus outfit ideas.
///
/// Steps run strictly in order: store, analyze, load wardrobe, suggest.
/// Only storage can fail the request; every later step degrades to a safe
/// default instead.
pub struct IngestionPipeline {
    storage: Arc<dyn ImageStorage>,
    analyzer: Arc<dyn SneakerAnalyzer>,
    suggester: Arc<dyn OutfitSuggester>,
    wardrobe_repo: Arc<dyn WardrobeRepository>,
    policy: IngestPolicy,
}

impl IngestionPipeline {
    pub fn new(
        storage: Arc<dyn ImageStorage>,
        analyzer: Arc<dyn SneakerAnalyzer>,
        suggester: Arc<dyn OutfitSuggester>,
        wardrobe_repo: Arc<dyn WardrobeRepository>,
        policy: IngestPolicy,
    ) -> Self {
        IngestionPipeline {
            storage,
            analyzer,
            suggester,
            wardrobe_repo,
            policy,
        }
    }

    #[instrument(skip(self, upload), fields(size = upload.size(), content_type = %upload.content_type()))]
    pub async fn ingest(&self, upload: ImageUpload, user_id: &str) -> Result<IngestOutcome, AppError> {
        let stored = self.store(&upload).await?;
        let stored_image_url = self.storage.public_url(&stored.path);

        let analysis = self.analyze(&upload).await;
        let wardrobe = self.wardrobe_context(user_id).await;
        let suggestions = self.suggest(&analysis, &wardrobe).await;

        info!(
            brand = %analysis.brand,
            outfits = suggestions.len(),
            wardrobe_items = wardrobe.len(),
            "Ingestion complete"
        );

        Ok(IngestOutcome {
            analysis,
            suggestions,
            stored_image_url,
        })
    }

    async fn store(&self, upload: &ImageUpload) -> Result<StoredObject, AppError> {
        let file_name = sanitize_filename(upload.file_name(), upload.content_type());

        retry_fixed(
            "Image upload",
            self.policy.upload_attempts,
            self.policy.upload_retry_delay,
            |_| self.storage.upload(&file_name, upload.data().clone(), upload.content_type()),
        )
        .await
        .map_err(|e| {
            error!(file_name = %file_name, error = %e, "Image upload failed after all attempts");
            AppError::StorageFailure(format!("Failed to upload image to storage: {e}"))
        })
    }

    /// Never fails. Timing out drops the in-flight call, which aborts its request.
    async fn analyze(&self, upload: &ImageUpload) -> SneakerAnalysis {
        let call = self
            .analyzer
            .analyze(upload.data().clone(), upload.content_type());

        match tokio::time::timeout(self.policy.analysis_timeout, call).await {
            Ok(Ok(analysis)) if analysis.is_usable() => analysis,
            Ok(Ok(_)) => {
                warn!("Analysis result has no brand; using fallback");
                SneakerAnalysis::fallback()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Sneaker analysis failed; using fallback");
                SneakerAnalysis::fallback()
            }
            Err(_) => {
                warn!(
                    timeout = ?self.policy.analysis_timeout,
                    "Sneaker analysis timed out; using fallback"
                );
                SneakerAnalysis::fallback()
            }
        }
    }

    async fn wardrobe_context(&self, user_id: &str) -> Vec<WardrobeItem> {
        self.wardrobe_repo
            .list_items(user_id)
            .await
            .unwrap_or_else(|e| {
                warn!(user_id, error = %e, "Wardrobe lookup failed; continuing without it");
                Vec::new()
            })
    }

    async fn suggest(&self, analysis: &SneakerAnalysis, wardrobe: &[WardrobeItem]) -> Vec<OutfitSuggestion> {
        match self.suggester.suggest(analysis, &[], wardrobe).await {
            Ok(set) => set.into_capped(self.policy.max_suggestions),
            Err(e) => {
                warn!(error = %e, "Outfit generation failed; returning no suggestions");
                Vec::new()
            }
        }
    }
}
