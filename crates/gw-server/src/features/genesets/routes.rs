use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use axum_extra::extract::Query as RepeatedQuery;
use serde::Deserialize;

use super::commands::{
    self, AddGenesetTermCommand, RemoveGenesetTermCommand, UpdateThresholdCommand,
};
use super::queries::{
    self, GenesetDetail, GenesetSearchQuery, GenesetTermsQuery, GenesetValuesQuery, GetGenesetQuery,
    ListGenesetsQuery, MetadataQuery,
};
use crate::api::response::ApiResponse;
use crate::auth::{Caller, OptionalCaller};
use crate::error::ServiceError;
use crate::features::FeatureState;
use crate::store::{Geneset, GenesetValue, OntologyTerm, Publication};

pub fn genesets_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_genesets))
        .route("/search", get(search_genesets))
        .route("/:id", get(get_geneset))
        .route("/:id/values", get(get_values))
        .route("/:id/metadata", get(get_metadata))
        .route("/:id/publication", get(get_publication))
        .route("/:id/threshold", put(update_threshold))
        .route("/:id/ontologies", get(list_terms).put(add_term))
        .route("/:id/ontologies/:ontology_id", delete(remove_term))
}

#[derive(Debug, Deserialize)]
struct TermParam {
    ontology_id: String,
}

#[tracing::instrument(skip(state, caller, query))]
async fn list_genesets(
    State(state): State<FeatureState>,
    OptionalCaller(caller): OptionalCaller,
    RepeatedQuery(query): RepeatedQuery<ListGenesetsQuery>,
) -> Result<ApiResponse<Vec<Geneset>>, ServiceError> {
    let response = queries::list::handle(state.store.as_ref(), caller.as_ref(), query).await?;
    Ok(ApiResponse::success_with_meta(response.items, response.window))
}

async fn search_genesets(
    State(state): State<FeatureState>,
    OptionalCaller(caller): OptionalCaller,
    Query(query): Query<GenesetSearchQuery>,
) -> Result<ApiResponse<Vec<Geneset>>, ServiceError> {
    let response = queries::search::handle(state.store.as_ref(), caller.as_ref(), query).await?;
    Ok(ApiResponse::success_with_meta(response.items, response.window))
}

#[tracing::instrument(skip(state, user, query))]
async fn get_geneset(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(id): Path<i64>,
    Query(query): Query<GetGenesetQuery>,
) -> Result<ApiResponse<GenesetDetail>, ServiceError> {
    let detail = queries::get::handle(state.store.as_ref(), &user, id, query).await?;
    Ok(ApiResponse::success(detail))
}

async fn get_values(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(id): Path<i64>,
    Query(query): Query<GenesetValuesQuery>,
) -> Result<ApiResponse<Vec<GenesetValue>>, ServiceError> {
    let values = queries::values::handle(state.store.as_ref(), &user, id, query).await?;
    Ok(ApiResponse::success(values))
}

async fn get_metadata(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(id): Path<i64>,
    Query(query): Query<MetadataQuery>,
) -> Result<ApiResponse<Geneset>, ServiceError> {
    let geneset = queries::get::handle_metadata(state.store.as_ref(), &user, id, query).await?;
    Ok(ApiResponse::success(geneset))
}

async fn get_publication(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Publication>, ServiceError> {
    let publication = queries::get::handle_publication(state.store.as_ref(), &user, id).await?;
    Ok(ApiResponse::success(publication))
}

async fn list_terms(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(id): Path<i64>,
    Query(query): Query<GenesetTermsQuery>,
) -> Result<ApiResponse<Vec<OntologyTerm>>, ServiceError> {
    let (terms, window) = queries::ontologies::handle(state.store.as_ref(), &user, id, query).await?;
    Ok(ApiResponse::success_with_meta(terms, window))
}

#[tracing::instrument(skip(state, user, command), fields(user_id = user.id))]
async fn update_threshold(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(id): Path<i64>,
    Json(command): Json<UpdateThresholdCommand>,
) -> Result<StatusCode, ServiceError> {
    commands::threshold::handle(state.store.as_ref(), &user, id, command).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, user), fields(user_id = user.id))]
async fn add_term(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path(id): Path<i64>,
    Query(param): Query<TermParam>,
) -> Result<StatusCode, ServiceError> {
    let command = AddGenesetTermCommand {
        geneset_id: id,
        ontology_id: param.ontology_id,
    };
    commands::ontology::add(state.store.as_ref(), &user, command).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, user), fields(user_id = user.id))]
async fn remove_term(
    State(state): State<FeatureState>,
    Caller(user): Caller,
    Path((id, ontology_id)): Path<(i64, String)>,
) -> Result<StatusCode, ServiceError> {
    let command = RemoveGenesetTermCommand {
        geneset_id: id,
        ontology_id,
    };
    commands::ontology::remove(state.store.as_ref(), &user, command).await?;
    Ok(StatusCode::NO_CONTENT)
}
