pub mod score_routes;
