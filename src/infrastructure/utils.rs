pub mod filename;
pub mod retry;
pub mod valid_uuid;
