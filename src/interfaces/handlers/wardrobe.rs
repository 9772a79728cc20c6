use actix_web::{web, HttpResponse, Responder};

use crate::{
    entities::wardrobe::{DeleteWardrobeItem, NewWardrobeItem, WardrobeQuery},
    errors::AppError,
    AppState,
};

pub async fn list_wardrobe(
    state: web::Data<AppState>,
    query: web::Query<WardrobeQuery>,
) -> Result<impl Responder, AppError> {
    let items = state
        .wardrobe_handler
        .list_items(query.user_id.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(items))
}

pub async fn create_wardrobe_item(
    state: web::Data<AppState>,
    body: web::Json<NewWardrobeItem>,
) -> Result<impl Responder, AppError> {
    let item = state.wardrobe_handler.create_item(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(item))
}

pub async fn delete_wardrobe_item(
    state: web::Data<AppState>,
    body: web::Json<DeleteWardrobeItem>,
) -> Result<impl Responder, AppError> {
    let response = state.wardrobe_handler.delete_item(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}
