pub mod ai;
pub mod db;
pub mod scraper;
pub mod storage;
pub mod utils;
