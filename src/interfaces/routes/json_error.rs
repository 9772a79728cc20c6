use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{
    error::{JsonPayloadError, PayloadError, QueryPayloadError},
    http::StatusCode,
    web, HttpResponse, ResponseError,
};
use serde_json::json;

use crate::{
    constants::MULTIPART_OVERHEAD_BYTES,
    errors::{AppError, UploadError},
};

/// Turns extractor failures (bad JSON, bad query, bad or oversized multipart)
/// into 400 responses with a JSON body.
pub fn config_routes(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    let multipart_limit = max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        RequestBodyError::from(err).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        RequestBodyError::from(err).into()
    }))
    .app_data(
        MultipartFormConfig::default()
            .total_limit(multipart_limit)
            .memory_limit(multipart_limit)
            .error_handler(move |err, _req| multipart_rejection(err, max_upload_bytes)),
    );
}

/// Maps a multipart failure to the response the upload endpoint promises.
/// Bodies over the size cap read as an oversized image and requests that
/// are not multipart at all read as a missing image.
fn multipart_rejection(err: MultipartError, max_upload_bytes: usize) -> actix_web::Error {
    match err {
        MultipartError::Payload(PayloadError::Overflow) => {
            AppError::from(UploadError::FileTooLarge(max_upload_bytes)).into()
        }
        MultipartError::ContentTypeMissing
        | MultipartError::ContentTypeParse
        | MultipartError::ContentTypeIncompatible
        | MultipartError::BoundaryMissing => AppError::from(UploadError::MissingImage).into(),
        other => RequestBodyError::from(other).into(),
    }
}

#[derive(Debug)]
pub struct RequestBodyError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for RequestBodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for RequestBodyError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({ "error": self.message }))
    }
}

impl From<JsonPayloadError> for RequestBodyError {
    fn from(err: JsonPayloadError) -> Self {
        RequestBodyError {
            message: format!("JSON payload error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<QueryPayloadError> for RequestBodyError {
    fn from(err: QueryPayloadError) -> Self {
        RequestBodyError {
            message: format!("Query string error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<MultipartError> for RequestBodyError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err, "Rejected multipart upload");
        RequestBodyError {
            message: format!("Invalid upload: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}
