pub mod analysis;
pub mod scraper;
pub mod sqlx_repo;
pub mod storage;
pub mod suggestion;
pub mod wardrobe;
