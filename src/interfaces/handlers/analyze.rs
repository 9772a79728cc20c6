use actix_multipart::{
    form::{bytes::Bytes as FileBytes, text::Text, MultipartForm},
    MultipartError,
};
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;

use crate::{
    constants::{DEFAULT_USER_ID, GENERIC_FAILURE_DETAILS},
    entities::{outfit::OutfitSuggestion, sneaker::SneakerAnalysis, upload::ImageUpload},
    errors::{AppError, UploadError},
    handlers::json_error::json_error,
    AppState,
};

#[derive(MultipartForm)]
pub struct AnalyzeForm {
    pub image: Option<FileBytes>,
    #[multipart(rename = "userId")]
    pub user_id: Option<Text<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub sneaker: SneakerAnalysis,
    pub image_url: String,
    pub outfits: Vec<OutfitSuggestion>,
    pub message: &'static str,
}

/// Content-type failures are raised before the form's error handler runs, so
/// they are caught here to answer like any other upload without an image.
fn is_not_multipart(err: &actix_web::Error) -> bool {
    matches!(
        err.as_error::<MultipartError>(),
        Some(
            MultipartError::ContentTypeMissing
                | MultipartError::ContentTypeParse
                | MultipartError::ContentTypeIncompatible
                | MultipartError::BoundaryMissing
        )
    )
}

pub async fn analyze_sneaker(
    state: web::Data<AppState>,
    form: Result<MultipartForm<AnalyzeForm>, actix_web::Error>,
) -> Result<HttpResponse, actix_web::Error> {
    let form = match form {
        Ok(MultipartForm(form)) => form,
        Err(e) if is_not_multipart(&e) => return Err(AppError::from(UploadError::MissingImage).into()),
        Err(e) => return Err(e),
    };

    let image = form.image.ok_or(AppError::from(UploadError::MissingImage))?;

    let upload = ImageUpload::new(
        image.data,
        image.content_type.as_ref().map(|mime| mime.essence_str()),
        image.file_name,
        state.max_upload_bytes,
    )
    .map_err(AppError::from)?;

    let user_id = form
        .user_id
        .map(|text| text.0.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    match state.ingest_pipeline.ingest(upload, &user_id).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(AnalyzeResponse {
            sneaker: outcome.analysis,
            image_url: outcome.stored_image_url,
            outfits: outcome.suggestions,
            message: "Analysis complete",
        })),
        Err(e) => {
            tracing::error!(error = %e, %user_id, "Sneaker analysis request failed");
            let details = if state.expose_error_details {
                e.to_string()
            } else {
                GENERIC_FAILURE_DETAILS.to_string()
            };
            Ok(json_error(StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed", &details))
        }
    }
}
