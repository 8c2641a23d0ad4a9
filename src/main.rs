use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use brainbench::config::cors::configure_cors;
use brainbench::config::database::connect_score_store;
use brainbench::config::logging::init_tracing;
use brainbench::config::routes::configure_routes;
use brainbench::config::settings::AppConfig;
use brainbench::services::ScoreService;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };

    let store = match connect_score_store(&config).await {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "could not open score store");
            return Err(std::io::Error::new(std::io::ErrorKind::Other, err));
        }
    };
    let service = web::Data::new(ScoreService::new(store));

    let address = config.server_address();
    info!("Server is running on http://{}", address);

    let cors_origin = config.cors_origin.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&cors_origin))
            .app_data(service.clone())
            .configure(configure_routes)
    })
    .bind(address)?
    .run()
    .await
}
