//! Server configuration loaded from a TOML file

use axum_db_admin::AdminConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,

    /// Router settings; `database_url` is taken from `[database]`
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,

    /// Create and fill the demo rental schema (SQLite only)
    pub seed_demo_data: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite:./data/sakila.db?mode=rwc".to_string(),
            max_connections: 5,
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load `path` when it exists, defaults otherwise, then apply environment
    /// overrides and validate
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.finalize()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// Note: Environment overrides are applied separately by [`ServerConfig::load`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }

    /// Apply `DB_ADMIN_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DB_ADMIN_DATABASE_URL") {
            self.database.url = url;
        }

        if let Some(host) = lookup("DB_ADMIN_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("DB_ADMIN_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid DB_ADMIN_PORT value: {}", port))?;
        }

        if let Some(level) = lookup("DB_ADMIN_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        Ok(())
    }

    /// Copy the connection string into the router settings and validate.
    ///
    /// Call this after applying environment overrides.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.admin.database_url = self.database.url.clone();
        self.validate()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.database.url.trim().is_empty() {
            return Err(anyhow::anyhow!("Database url cannot be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections cannot be 0"));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_LOG_FORMATS.join(", ")
            ));
        }

        if self.admin.max_page_size == 0 {
            return Err(anyhow::anyhow!("max_page_size cannot be 0"));
        }

        if self.admin.default_page_size > self.admin.max_page_size {
            return Err(anyhow::anyhow!(
                "default_page_size ({}) cannot exceed max_page_size ({})",
                self.admin.default_page_size,
                self.admin.max_page_size
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
