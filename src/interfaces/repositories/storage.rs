use actix_web::web::Bytes;
use async_trait::async_trait;
use mockall::automock;

/// Location of an object the storage service accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub path: String,
}

#[automock]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Uploads one object. A single call is a single attempt; retrying is the caller's job.
    async fn upload(&self, file_name: &str, data: Bytes, content_type: &str) -> anyhow::Result<StoredObject>;

    /// Public URL for a stored path, built by template rather than asked of the service.
    fn public_url(&self, path: &str) -> String;
}
