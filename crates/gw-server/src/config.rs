//! Configuration management

use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// All routes are mounted under this prefix.
pub const DEFAULT_API_PREFIX: &str = "/api";

pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/geneweaver";

pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Schemas of the GeneWeaver database, searched in this order.
pub const DEFAULT_DATABASE_SEARCH_PATH: &str = "production, extsrc, odestatic, curation, public";

pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

pub const DEFAULT_PUBMED_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

pub const DEFAULT_PUBMED_TIMEOUT_SECS: u64 = 15;

/// Largest accepted batch upload (10 MiB).
pub const DEFAULT_BATCH_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub pubmed: PubmedConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    pub api_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub search_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// NCBI E-utilities access for publication imports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubmedConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub max_upload_bytes: usize,
    pub default_encoding: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from `.env`, the environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env_string("GW_HOST", DEFAULT_SERVER_HOST),
                port: env_or("GW_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or("GW_SHUTDOWN_TIMEOUT", DEFAULT_SHUTDOWN_TIMEOUT_SECS),
                api_prefix: normalize_prefix(&env_string("GW_API_PREFIX", DEFAULT_API_PREFIX)),
            },
            database: DatabaseConfig {
                url: env_string("DATABASE_URL", DEFAULT_DATABASE_URL),
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS),
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", DEFAULT_DATABASE_MIN_CONNECTIONS),
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_or("DATABASE_IDLE_TIMEOUT", DEFAULT_DATABASE_IDLE_TIMEOUT_SECS),
                search_path: env_string("DATABASE_SEARCH_PATH", DEFAULT_DATABASE_SEARCH_PATH),
            },
            cors: CorsConfig {
                allowed_origins: env_string("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ALLOWED_ORIGIN)
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true),
            },
            pubmed: PubmedConfig {
                base_url: env_string("PUBMED_BASE_URL", DEFAULT_PUBMED_BASE_URL),
                api_key: std::env::var("PUBMED_API_KEY").ok().filter(|k| !k.trim().is_empty()),
                timeout_secs: env_or("PUBMED_TIMEOUT", DEFAULT_PUBMED_TIMEOUT_SECS),
            },
            batch: BatchConfig {
                max_upload_bytes: env_or("BATCH_MAX_UPLOAD_BYTES", DEFAULT_BATCH_MAX_UPLOAD_BYTES),
                default_encoding: env_string(
                    "BATCH_DEFAULT_ENCODING",
                    gw_common::parse::encoding::DEFAULT_ENCODING,
                ),
            },
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if !self.server.api_prefix.is_empty() && !self.server.api_prefix.starts_with('/') {
            anyhow::bail!("API prefix must start with '/': {}", self.server.api_prefix);
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.batch.max_upload_bytes == 0 {
            anyhow::bail!("Batch max upload size must be greater than 0");
        }

        // Fails early on an encoding the upload decoder cannot handle
        gw_common::parse::decode_upload(b"", &self.batch.default_encoding)
            .map_err(|e| anyhow::anyhow!("Invalid BATCH_DEFAULT_ENCODING: {}", e))?;

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }
}

/// `api/` -> `/api`, `/` -> `` (mount at root)
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                api_prefix: DEFAULT_API_PREFIX.to_string(),
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                search_path: DEFAULT_DATABASE_SEARCH_PATH.to_string(),
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            pubmed: PubmedConfig {
                base_url: DEFAULT_PUBMED_BASE_URL.to_string(),
                api_key: None,
                timeout_secs: DEFAULT_PUBMED_TIMEOUT_SECS,
            },
            batch: BatchConfig::default(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_BATCH_MAX_UPLOAD_BYTES,
            default_encoding: gw_common::parse::encoding::DEFAULT_ENCODING.to_string(),
        }
    }
}
