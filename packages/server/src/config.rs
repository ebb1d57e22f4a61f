use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. When unset, records are kept in process memory.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider that issues tokens.
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory for uploaded images. Must be readable by the classifier.
    pub images_dir: PathBuf,
    /// Maximum size of a single image in bytes.
    pub max_image_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    /// Base URL of the classification service, e.g. `http://localhost:5001`.
    pub base_url: String,
    /// Upper bound on a classifier call; past it the batch falls back.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Maximum number of images accepted in one upload.
    pub max_images: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub inference: InferenceConfig,
    pub prediction: PredictionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.images_dir", "./uploads")?
            .set_default("storage.max_image_size", 10 * 1024 * 1024)?
            .set_default("inference.base_url", "http://localhost:5001")?
            .set_default("inference.timeout_secs", 30)?
            .set_default("prediction.max_images", 10)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., LEAFWATCH__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("LEAFWATCH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
