use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};

use super::commands::{self, AddPubmedResponse};
use super::queries::{self, GetPublicationQuery};
use crate::api::response::ApiResponse;
use crate::auth::Caller;
use crate::error::ServiceError;
use crate::features::FeatureState;
use crate::store::Publication;

pub fn publications_routes() -> Router<FeatureState> {
    Router::new()
        .route("/:id", get(get_publication))
        .route("/pubmed/:pubmed_id", post(add_pubmed))
}

#[tracing::instrument(skip(state, query))]
async fn get_publication(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    Query(query): Query<GetPublicationQuery>,
) -> Result<ApiResponse<Publication>, ServiceError> {
    let publication = queries::get::handle(state.store.as_ref(), &id, query).await?;
    Ok(ApiResponse::success(publication))
}

#[tracing::instrument(skip(state, user), fields(user_id = user.id))]
async fn add_pubmed(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(pubmed_id): Path<String>,
) -> Result<ApiResponse<AddPubmedResponse>, ServiceError> {
    let response =
        commands::add_pubmed::handle(state.store.as_ref(), state.pubmed.as_ref(), &pubmed_id).await?;
    Ok(ApiResponse::success(response))
}
