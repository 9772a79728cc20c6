use actix_web::web;

use crate::constants::MAX_IMAGE_BYTES;

mod analyze;
mod json_error;
mod system;
mod trends;
mod wardrobe;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_routes_with_upload_limit(cfg, MAX_IMAGE_BYTES);
}

/// Same routes, with the multipart body cap sized for `max_upload_bytes`.
pub fn configure_routes_with_upload_limit(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.configure(system::config_routes);

    cfg.service(
        web::scope("/api")
            .configure(analyze::config_routes)
            .configure(wardrobe::config_routes)
            .configure(trends::config_routes)
    );

    json_error::config_routes(cfg, max_upload_bytes);
}
