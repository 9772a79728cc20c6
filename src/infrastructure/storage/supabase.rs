use std::time::Duration;

use actix_web::web::Bytes;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    repositories::storage::{ImageStorage, StoredObject},
    settings::AppConfig,
};

/// Supabase Storage over its REST API.
pub struct SupabaseStorage {
    http_client: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, bucket: &str, service_key: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to create HTTP client for Supabase storage, using default client");
                reqwest::Client::default()
            });

        SupabaseStorage {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            service_key: service_key.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.supabase_url, &config.storage_bucket, &config.supabase_service_key)
    }

    fn object_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(file_name)
        )
    }

    /// The service answers `Key` as `{bucket}/{path}`; callers want the path.
    fn stored_path(&self, key: Option<String>, file_name: &str) -> String {
        key.and_then(|k| {
            k.strip_prefix(&format!("{}/", self.bucket))
                .map(str::to_string)
        })
        .unwrap_or_else(|| file_name.to_string())
    }
}

#[async_trait]
impl ImageStorage for SupabaseStorage {
    async fn upload(&self, file_name: &str, data: Bytes, content_type: &str) -> Result<StoredObject> {
        let size = data.len();
        let response = self
            .http_client
            .post(self.object_url(file_name))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .context("Failed to send upload request to Supabase storage")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StorageErrorBody>(&body)
                .ok()
                .and_then(|b| b.message.or(b.error))
                .unwrap_or(body);
            return Err(anyhow::anyhow!(
                "Supabase storage rejected upload ({}): {}",
                status,
                message
            ));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .context("Failed to parse Supabase storage response")?;

        tracing::debug!(file_name, size, "Image stored");

        Ok(StoredObject {
            path: self.stored_path(parsed.key, file_name),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::new("https://project.supabase.co/", "sneaker-images", "key")
    }

    #[test]
    fn public_url_follows_the_template() {
        assert_eq!(
            storage().public_url("1700000000000-abc-kicks.jpg"),
            "https://project.supabase.co/storage/v1/object/public/sneaker-images/1700000000000-abc-kicks.jpg"
        );
    }

    #[test]
    fn object_url_encodes_the_name() {
        assert_eq!(
            storage().object_url("a b.jpg"),
            "https://project.supabase.co/storage/v1/object/sneaker-images/a%20b.jpg"
        );
    }

    #[test]
    fn stored_path_strips_the_bucket_prefix() {
        let s = storage();
        assert_eq!(s.stored_path(Some("sneaker-images/x.jpg".into()), "x.jpg"), "x.jpg");
        assert_eq!(s.stored_path(None, "y.jpg"), "y.jpg");
    }
}
