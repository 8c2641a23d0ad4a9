use crate::config::settings::{AppConfig, StoreKind};
use crate::error::ConfigError;
use crate::repositories::{InMemoryScoreStore, MongoScoreStore, ScoreStore};
use mongodb::bson::doc;
use mongodb::Client;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn connect_to_mongodb(uri: &str) -> Result<Client, ConfigError> {
    let client = Client::with_uri_str(uri).await?;

    // The driver connects lazily; ping so a bad URI shows up at startup.
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    info!("MongoDB connected");

    Ok(client)
}

/// Builds the score store the server was configured for.
pub async fn connect_score_store(config: &AppConfig) -> Result<Arc<dyn ScoreStore>, ConfigError> {
    match config.store {
        StoreKind::Mongo => {
            let client = connect_to_mongodb(&config.mongodb_uri).await?;
            Ok(Arc::new(MongoScoreStore::new(&client, &config.db_name)))
        }
        StoreKind::Memory => {
            warn!("using in-memory score store, scores will not survive a restart");
            Ok(Arc::new(InMemoryScoreStore::new()))
        }
    }
}
