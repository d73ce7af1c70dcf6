//! Service health (`GET /monitors/servers/health`)

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::response::ApiResponse;
use crate::features::FeatureState;
use crate::store::Store;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthQuery {
    #[serde(default)]
    pub db_health_check: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub details: &'static str,
    pub datetime: NaiveDateTime,
    #[serde(rename = "DB_status", skip_serializing_if = "Option::is_none")]
    pub db_status: Option<DbStatus>,
}

pub fn monitors_routes() -> Router<FeatureState> {
    Router::new().route("/servers/health", get(health))
}

/// Liveness is always reported; a failing database shows up in
/// `DB_status` rather than as an error response.
pub async fn check<S: Store + ?Sized>(store: &S, query: HealthQuery) -> HealthReport {
    let db_status = if query.db_health_check {
        Some(match store.health_check().await {
            Ok(()) => DbStatus {
                status: "UP",
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "Database health check failed");
                DbStatus {
                    status: "DOWN",
                    error: Some(e.to_string()),
                }
            },
        })
    } else {
        None
    };

    HealthReport {
        status: "UP",
        details: "All systems normal.",
        datetime: Utc::now().naive_utc(),
        db_status,
    }
}

async fn health(State(state): State<FeatureState>, Query(query): Query<HealthQuery>) -> ApiResponse<HealthReport> {
    ApiResponse::success(check(state.store.as_ref(), query).await)
}
