use actix_web::{web, HttpResponse, Responder};

use crate::{entities::trend::TrendQuery, errors::AppError, AppState};

pub async fn get_trends(
    state: web::Data<AppState>,
    query: web::Query<TrendQuery>,
) -> Result<impl Responder, AppError> {
    let TrendQuery { brand, model } = query.into_inner();
    let (brand, model) = (brand.trim(), model.trim());

    if brand.is_empty() && model.is_empty() {
        return Err(AppError::InvalidInput("brand or model is required".to_string()));
    }

    let trends = state.trend_cache.get_trends(brand, model).await;

    Ok(HttpResponse::Ok().json(trends))
}
