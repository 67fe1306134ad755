//! Application configuration loaded from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use strum::{Display, EnumString};

/// Which persistence backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// MongoDB document store.
    #[default]
    Mongo,
    /// Process-local store, lost on restart.
    Memory,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Store ===
    /// MongoDB connection string (required for the mongo backend).
    #[serde(default)]
    pub mongo_uri: Option<String>,

    /// Database holding the tours collection.
    #[serde(default = "default_database")]
    pub mongo_database: String,

    /// Collection name for tour documents.
    #[serde(default = "default_collection")]
    pub mongo_collection: String,

    /// Persistence backend: mongo or memory.
    #[serde(default)]
    pub store_backend: StoreBackend,

    // === Server Configuration ===
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory with the static browser client, served as a fallback.
    #[serde(default)]
    pub frontend_dir: Option<PathBuf>,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_database() -> String {
    "travel_tour".to_string()
}

fn default_collection() -> String {
    "tours".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongo_uri: None,
            mongo_database: default_database(),
            mongo_collection: default_collection(),
            store_backend: StoreBackend::default(),
            host: default_host(),
            port: default_port(),
            frontend_dir: None,
            rust_log: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.store_backend == StoreBackend::Mongo {
            let uri = self.mongo_uri.as_deref().unwrap_or_default();
            if uri.trim().is_empty() {
                return Err("MONGO_URI is required for the mongo backend".to_string());
            }
            if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
                return Err("MONGO_URI must start with mongodb:// or mongodb+srv://".to_string());
            }
            if self.mongo_database.trim().is_empty() {
                return Err("MONGO_DATABASE must not be empty".to_string());
            }
            if self.mongo_collection.trim().is_empty() {
                return Err("MONGO_COLLECTION must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Socket address to bind the HTTP server to.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("invalid HOST/PORT {}:{}: {}", self.host, self.port, e))
    }

    /// Connection string with any credentials masked, for logging.
    pub fn redacted_mongo_uri(&self) -> Option<String> {
        let uri = self.mongo_uri.as_deref()?;
        let Some((scheme, rest)) = uri.split_once("://") else {
            return Some(uri.to_string());
        };
        match rest.rsplit_once('@') {
            Some((_, host)) => Some(format!("{}://***@{}", scheme, host)),
            None => Some(uri.to_string()),
        }
    }
}
