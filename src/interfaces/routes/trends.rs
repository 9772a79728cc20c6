use actix_web::web;

use crate::handlers::trends;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/trends")
            .route(web::get().to(trends::get_trends))
    );
}
