use actix_web::{http::StatusCode, HttpResponse};

/// Error body carrying a caller-facing `details` line next to the summary.
pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details
    }))
}
