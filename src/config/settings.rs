use crate::constants::DB_NAME;
use crate::error::ConfigError;
use dotenv::dotenv;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

/// Server settings, read from the environment (and `.env` when present).
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub db_name: String,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub store: StoreKind,
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let port_raw = var_or("PORT", "5000");
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value: port_raw.clone(),
        })?;

        let store_raw = var_or("SCORE_STORE", "mongo");
        let store = match store_raw.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => StoreKind::Mongo,
            "memory" => StoreKind::Memory,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "SCORE_STORE",
                    value: store_raw,
                })
            }
        };

        Ok(AppConfig {
            mongodb_uri: var_or("MONGODB_URI", "mongodb://localhost:27017"),
            db_name: var_or("DB_NAME", DB_NAME),
            host: var_or("HOST", "localhost"),
            port,
            cors_origin: var_or("CORS_ORIGIN", "http://localhost:5173"),
            store,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
