pub mod ingest;
pub mod trends;
pub mod wardrobe;
