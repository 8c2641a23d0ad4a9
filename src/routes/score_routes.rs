use crate::controllers::score_controller::{
    add_score, get_leaderboard, get_user_best_scores, get_user_scores,
};
use actix_web::web;

pub fn configure_score_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/add", web::post().to(add_score))
        .route("/user/{id}", web::get().to(get_user_scores))
        .route("/user/{id}/best", web::get().to(get_user_best_scores))
        .route("/leaderboard/{test_type}", web::get().to(get_leaderboard));
}
