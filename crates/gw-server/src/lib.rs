//! GeneWeaver API server
//!
//! REST API over the GeneWeaver database: genes and identifier mapping
//! across species, genesets with tiered visibility, publications, species
//! metadata, search and batch geneset uploads.
//!
//! # Architecture
//!
//! - [`features`] holds vertical slices (`queries/`, `commands/`,
//!   `routes.rs`) whose handlers depend only on the [`store`] traits
//! - [`db`] implements those traits over Postgres with SQLx
//! - [`auth`] turns gateway identity headers into a user record
//! - [`pubmed`] fetches citation metadata from NCBI E-utilities
//! - [`api`] assembles the router and serves it
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gw_server::{api, config::Config, db, features::FeatureState, pubmed::EutilsClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&db::DbConfig::from(&config.database)).await?;
//!     let state = FeatureState {
//!         store: Arc::new(db::PgStore::new(pool)),
//!         pubmed: Arc::new(EutilsClient::new(&config.pubmed)?),
//!         batch: config.batch.clone(),
//!     };
//!     api::serve(state, &config).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod pubmed;
pub mod store;

pub use error::{ErrorKind, ServiceError, ServiceResult};
