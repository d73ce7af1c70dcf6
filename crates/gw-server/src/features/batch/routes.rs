use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::post,
    Router,
};
use gw_common::parse::BatchGeneset;
use serde::Deserialize;

use super::commands::{self, BatchError, BatchGenesetSummary, BatchResponse, ProcessBatchCommand};
use crate::api::response::ApiResponse;
use crate::auth::Caller;
use crate::error::ServiceError;
use crate::features::FeatureState;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn batch_routes(max_upload_bytes: usize) -> Router<FeatureState> {
    Router::new()
        .route("/", post(upload_batch))
        .route("/validate", post(validate_batch))
        .layer(DefaultBodyLimit::max(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)))
}

#[derive(Debug, Default, Deserialize)]
struct BatchQuery {
    encoding: Option<String>,
}

async fn read_batch_file(mut multipart: Multipart) -> Result<Vec<u8>, BatchError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BatchError::Multipart(e.to_string()))?
    {
        if field.name() == Some("batch_file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| BatchError::Multipart(e.to_string()))?;
            return Ok(data.to_vec());
        }
    }
    Err(BatchError::MissingFile)
}

#[tracing::instrument(skip(state, user, multipart), fields(user_id = user.id))]
async fn upload_batch(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Query(query): Query<BatchQuery>,
    multipart: Multipart,
) -> Result<ApiResponse<BatchResponse<BatchGeneset>>, ServiceError> {
    let command = ProcessBatchCommand {
        contents: read_batch_file(multipart).await?,
        encoding: query.encoding,
    };
    let outcome = commands::process::handle(&state.batch, command)?;
    let messages = outcome.messages();

    Ok(ApiResponse::success(BatchResponse {
        genesets: outcome.genesets,
        messages,
    }))
}

#[tracing::instrument(skip(state, multipart))]
async fn validate_batch(
    State(state): State<FeatureState>,
    Query(query): Query<BatchQuery>,
    multipart: Multipart,
) -> Result<ApiResponse<BatchResponse<BatchGenesetSummary>>, ServiceError> {
    let command = ProcessBatchCommand {
        contents: read_batch_file(multipart).await?,
        encoding: query.encoding,
    };
    let outcome = commands::process::handle(&state.batch, command)?;

    Ok(ApiResponse::success(BatchResponse {
        genesets: outcome.genesets.iter().map(BatchGenesetSummary::from).collect(),
        messages: outcome.messages(),
    }))
}
