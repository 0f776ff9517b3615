//! Application configuration loaded from environment variables.

use std::env;

use bazar_infra::database::DatabaseConfig;

/// Expiration sweep configuration.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub enabled: bool,
    /// Cron expression (with seconds field); hourly by default.
    pub schedule: String,
}

impl SweepConfig {
    fn from_env() -> Self {
        Self {
            enabled: env::var("SWEEP_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            schedule: env::var("SWEEP_SCHEDULE").unwrap_or_else(|_| "0 0 * * * *".to_string()),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub uploads_dir: String,
    pub uploads_base_url: String,
    pub sweep: SweepConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
            uploads_base_url: env::var("UPLOADS_BASE_URL")
                .unwrap_or_else(|_| format!("http://{host}:{port}/uploads")),
            sweep: SweepConfig::from_env(),
            host,
            port,
            database,
        }
    }
}
