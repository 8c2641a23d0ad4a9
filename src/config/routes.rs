use crate::controllers::score_controller::{health, json_error_handler};
use crate::routes::score_routes::configure_score_routes;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(health))
        .service(web::scope("/api/scores").configure(configure_score_routes));
}
