//! Postgres access
//!
//! [`PgStore`] implements the [`crate::store`] traits against the
//! GeneWeaver schema. The schema is owned by the GeneWeaver database
//! project; this crate only reads and writes it. Queries are checked at
//! runtime (`sqlx::query_as` and [`sqlx::QueryBuilder`]), so building does
//! not need a live database.

mod constraints;
mod genes;
mod genesets;
mod ontology;
mod publications;
mod species;
mod users;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::store::Store;

pub use constraints::map_unique_violation;

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Database configuration is invalid or missing
    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),

    /// Requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Record already exists (unique constraint violation)
    #[error("{0}")]
    Duplicate(String),

    /// A stored code outside its vocabulary
    #[error("Invalid stored value: {0}")]
    InvalidCode(String),
}

impl DbError {
    pub fn not_found(resource_type: &str, identifier: &str) -> Self {
        Self::NotFound(format!("{} '{}' not found in database", resource_type, identifier))
    }

    pub fn duplicate(resource_type: &str, identifier: &str) -> Self {
        Self::Duplicate(format!("{} '{}' already exists", resource_type, identifier))
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<gw_common::GwError> for DbError {
    fn from(err: gw_common::GwError) -> Self {
        Self::InvalidCode(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: Option<u64>,
    pub search_path: String,
}

impl From<&DatabaseConfig> for DbConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: Some(config.idle_timeout_secs).filter(|secs| *secs > 0),
            search_path: config.search_path.clone(),
        }
    }
}

impl DbConfig {
    /// Schema names joined by commas; anything else is rejected since the
    /// value is interpolated into `SET search_path`.
    fn validated_search_path(&self) -> DbResult<String> {
        let schemas: Vec<&str> = self
            .search_path
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if schemas.is_empty() {
            return Err(DbError::config("search path is empty"));
        }
        if let Some(bad) = schemas
            .iter()
            .find(|s| !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        {
            return Err(DbError::config(format!("invalid schema name '{}' in search path", bad)));
        }

        Ok(schemas.join(", "))
    }
}

pub async fn create_pool(config: &DbConfig) -> DbResult<PgPool> {
    let search_path = config.validated_search_path()?;

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .after_connect(move |conn, _meta| {
            let statement = format!("SET search_path TO {}", search_path);
            Box::pin(async move {
                conn.execute(statement.as_str()).await?;
                Ok(())
            })
        });

    if let Some(idle_timeout) = config.idle_timeout_secs {
        options = options.idle_timeout(Duration::from_secs(idle_timeout));
    }

    let pool = options.connect(&config.url).await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> DbResult<()> {
        health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_path(path: &str) -> DbConfig {
        DbConfig {
            search_path: path.to_string(),
            ..DbConfig::from(&crate::config::Config::default().database)
        }
    }

    #[test]
    fn test_from_database_config() {
        let mut database = crate::config::Config::default().database;
        database.idle_timeout_secs = 0;
        let config = DbConfig::from(&database);
        assert_eq!(config.max_connections, database.max_connections);
        assert_eq!(config.idle_timeout_secs, None);
    }

    #[test]
    fn test_search_path_validation() {
        assert_eq!(
            config_with_path("production, extsrc,odestatic").validated_search_path().unwrap(),
            "production, extsrc, odestatic"
        );
        assert!(config_with_path("public; DROP TABLE usr").validated_search_path().is_err());
        assert!(config_with_path(" , ").validated_search_path().is_err());
    }

    #[test]
    fn test_error_helpers() {
        assert!(matches!(DbError::duplicate("Term", "GO:1"), DbError::Duplicate(_)));
        let err = DbError::not_found("Gene database", "7");
        assert_eq!(err.to_string(), "Gene database '7' not found in database");
    }
}
