pub mod cors;
pub mod database;
pub mod logging;
pub mod routes;
pub mod settings;
