//! Configuration management for the Bookshelf server

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// PostgreSQL connection settings.
///
/// `url` wins over the discrete fields when set.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// Which repository implementation backs the server
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from `config/` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config", env::vars().collect())
    }

    /// Load configuration from the files in `dir`, layered under `vars`.
    ///
    /// Precedence, lowest first: built-in defaults, `default.toml`,
    /// `{RUN_MODE}.toml`, `BOOKSHELF__*` variables, then `DATABASE_URL`
    /// and `LOG_LEVEL`.
    pub fn load_from(
        dir: impl AsRef<Path>,
        vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());
        let database_url = vars.get("DATABASE_URL").cloned();
        let log_level = vars.get("LOG_LEVEL").cloned();

        let config = Config::builder()
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(&run_mode).to_string_lossy()).required(false))
            // BOOKSHELF__SERVER__PORT=9000 style overrides
            .add_source(
                Environment::with_prefix("BOOKSHELF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .set_override_option("database.url", database_url)?
            .set_override_option("logging.level", log_level)?
            .build()?;

        config.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Connection options for the pool
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return url.parse();
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            username: "bookshelf".to_string(),
            password: "bookshelf".to_string(),
            database: "bookshelf".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
