use actix_web::web::Bytes;

use crate::errors::UploadError;

/// A sneaker photo that passed validation and may enter the ingestion pipeline.
///
/// Only constructible through [`ImageUpload::new`], so holding one means the
/// size and type checks already ran.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    data: Bytes,
    content_type: String,
    file_name: Option<String>,
}

impl ImageUpload {
    /// Validates size and type of an incoming photo.
    ///
    /// - the payload must be non-empty and at most `max_bytes`
    /// - the declared MIME type must start with `image/`
    /// - when the bytes carry a recognisable signature, it must be an image too
    pub fn new(
        data: Bytes,
        content_type: Option<&str>,
        file_name: Option<String>,
        max_bytes: usize,
    ) -> Result<Self, UploadError> {
        if data.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        if data.len() > max_bytes {
            return Err(UploadError::FileTooLarge(max_bytes));
        }

        let content_type = content_type
            .map(|ct| ct.trim().to_lowercase())
            .unwrap_or_default();
        if !content_type.starts_with("image/") {
            let shown = if content_type.is_empty() { "unknown".to_string() } else { content_type };
            return Err(UploadError::InvalidType(shown));
        }

        if let Some(kind) = infer::get(&data) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(UploadError::ContentMismatch(kind.mime_type().to_string()));
            }
        }

        Ok(ImageUpload {
            data,
            content_type,
            file_name,
        })
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_IMAGE_BYTES;

    const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    fn jpeg_of_len(len: usize) -> Bytes {
        let mut data = vec![0u8; len];
        data[..4].copy_from_slice(&JPEG_MAGIC);
        Bytes::from(data)
    }

    #[test]
    fn accepts_an_image_at_the_limit() {
        let upload = ImageUpload::new(
            jpeg_of_len(MAX_IMAGE_BYTES),
            Some("image/jpeg"),
            Some("kicks.jpg".into()),
            MAX_IMAGE_BYTES,
        )
        .unwrap();
        assert_eq!(upload.size(), MAX_IMAGE_BYTES);
        assert_eq!(upload.content_type(), "image/jpeg");
    }

    #[test]
    fn rejects_one_byte_over_the_limit() {
        let err = ImageUpload::new(
            jpeg_of_len(MAX_IMAGE_BYTES + 1),
            Some("image/jpeg"),
            None,
            MAX_IMAGE_BYTES,
        )
        .unwrap_err();
        assert_eq!(err, UploadError::FileTooLarge(MAX_IMAGE_BYTES));
    }

    #[test]
    fn rejects_non_image_mime_types() {
        let err = ImageUpload::new(jpeg_of_len(64), Some("application/pdf"), None, MAX_IMAGE_BYTES)
            .unwrap_err();
        assert_eq!(err, UploadError::InvalidType("application/pdf".into()));

        let missing = ImageUpload::new(jpeg_of_len(64), None, None, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(missing, UploadError::InvalidType("unknown".into()));
    }

    #[test]
    fn rejects_disguised_archives() {
        let mut zip = vec![0u8; 64];
        zip[..4].copy_from_slice(&[0x50, 0x4B, 0x03, 0x04]);
        let err = ImageUpload::new(Bytes::from(zip), Some("image/png"), None, MAX_IMAGE_BYTES)
            .unwrap_err();
        assert!(matches!(err, UploadError::ContentMismatch(_)));
    }

    #[test]
    fn unknown_signatures_trust_the_declared_type() {
        let upload = ImageUpload::new(Bytes::from_static(b"not-really-sniffable"), Some("Image/HEIC"), None, MAX_IMAGE_BYTES)
            .unwrap();
        assert_eq!(upload.content_type(), "image/heic");
    }

    #[test]
    fn rejects_empty_payloads() {
        let err = ImageUpload::new(Bytes::new(), Some("image/png"), None, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(err, UploadError::EmptyFile);
    }
}
