use actix_web::web;

use crate::handlers::wardrobe;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/wardrobe")
            .route(web::get().to(wardrobe::list_wardrobe))
            .route(web::post().to(wardrobe::create_wardrobe_item))
            .route(web::delete().to(wardrobe::delete_wardrobe_item))
    );
}
