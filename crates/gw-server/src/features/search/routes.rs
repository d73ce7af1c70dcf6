use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};

use super::query::{self, SearchQuery, SearchResults};
use crate::api::response::ApiResponse;
use crate::auth::OptionalCaller;
use crate::error::ServiceError;
use crate::features::FeatureState;

pub fn search_routes() -> Router<FeatureState> {
    Router::new().route("/", get(search))
}

#[tracing::instrument(
    skip(state, caller, query),
    fields(entities = %query.entities, search_text = %query.search_text)
)]
async fn search(
    State(state): State<FeatureState>,
    OptionalCaller(caller): OptionalCaller,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<SearchResults>, ServiceError> {
    let results = query::handle(state.store.as_ref(), caller.as_ref(), query).await?;

    tracing::debug!(
        genesets = results.genesets.as_ref().map(Vec::len),
        publications = results.publications.as_ref().map(Vec::len),
        "Search completed"
    );

    Ok(ApiResponse::success(results))
}
