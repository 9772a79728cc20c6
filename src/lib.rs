use std::{sync::Arc, time::Duration};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{ai, db, scraper, storage, utils};

use ai::gemini::GeminiClient;
use repositories::{
    analysis::SneakerAnalyzer, scraper::TrendScraper, sqlx_repo::SqlxWardrobeRepo,
    storage::ImageStorage, suggestion::OutfitSuggester, wardrobe::WardrobeRepository,
};
use scraper::pinterest::PinterestScraper;
use storage::supabase::SupabaseStorage;
use use_cases::{
    ingest::{IngestPolicy, IngestionPipeline},
    trends::TrendCache,
    wardrobe::WardrobeHandler,
};

/// External systems the service talks to.
pub struct Collaborators {
    pub storage: Arc<dyn ImageStorage>,
    pub analyzer: Arc<dyn SneakerAnalyzer>,
    pub suggester: Arc<dyn OutfitSuggester>,
    pub scraper: Arc<dyn TrendScraper>,
    pub wardrobe_repo: Arc<dyn WardrobeRepository>,
}

pub struct AppState {
    pub ingest_pipeline: IngestionPipeline,
    pub wardrobe_handler: WardrobeHandler,
    pub trend_cache: TrendCache,
    pub wardrobe_repo: Arc<dyn WardrobeRepository>,
    pub max_upload_bytes: usize,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let gemini = Arc::new(GeminiClient::from_config(config));

        let collaborators = Collaborators {
            storage: Arc::new(SupabaseStorage::from_config(config)),
            analyzer: gemini.clone(),
            suggester: gemini,
            scraper: Arc::new(PinterestScraper::new()),
            wardrobe_repo: Arc::new(SqlxWardrobeRepo::new(pool)),
        };

        let mut state = Self::from_collaborators(
            collaborators,
            IngestPolicy::from(config),
            config.trend_ttl(),
            config.exposes_error_details(),
        );
        state.max_upload_bytes = config.max_upload_bytes;
        state
    }

    pub fn from_collaborators(
        collaborators: Collaborators,
        policy: IngestPolicy,
        trend_ttl: Duration,
        expose_error_details: bool,
    ) -> Self {
        let Collaborators {
            storage,
            analyzer,
            suggester,
            scraper,
            wardrobe_repo,
        } = collaborators;

        AppState {
            ingest_pipeline: IngestionPipeline::new(
                storage,
                analyzer,
                suggester,
                wardrobe_repo.clone(),
                policy,
            ),
            wardrobe_handler: WardrobeHandler::new(wardrobe_repo.clone()),
            trend_cache: TrendCache::new(scraper, trend_ttl),
            wardrobe_repo,
            max_upload_bytes: constants::MAX_IMAGE_BYTES,
            expose_error_details,
        }
    }
}
