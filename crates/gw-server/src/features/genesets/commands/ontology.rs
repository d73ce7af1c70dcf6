//! Attaching ontology terms to genesets

use serde::{Deserialize, Serialize};

use crate::db::DbError;
use crate::error::ServiceError;
use crate::features::genesets::access::readable_geneset;
use crate::store::{GenesetStore, OntologyStore, UserRecord};

/// Reference type recorded for terms attached through the API.
pub const PRIMARY_ANNOTATION: &str = "GeneWeaver Primary Annotation";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddGenesetTermCommand {
    pub geneset_id: i64,
    /// Term reference id, e.g. `GO:0007611`
    pub ontology_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveGenesetTermCommand {
    pub geneset_id: i64,
    pub ontology_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenesetTermError {
    #[error("Ontology term id cannot be empty")]
    EmptyTermId,
    #[error("Ontology term '{0}' not found")]
    TermNotFound(String),
    #[error("Ontology term '{0}' is already attached to geneset '{1}'")]
    AlreadyAttached(String, i64),
    #[error("Ontology term '{0}' is not attached to geneset '{1}'")]
    NotAttached(String, i64),
    #[error("Caller may not change annotations of geneset '{0}'")]
    NotPermitted(i64),
    #[error(transparent)]
    Geneset(#[from] ServiceError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<GenesetTermError> for ServiceError {
    fn from(err: GenesetTermError) -> Self {
        match err {
            GenesetTermError::EmptyTermId => ServiceError::validation(err.to_string()),
            GenesetTermError::TermNotFound(_) | GenesetTermError::NotAttached(..) => {
                ServiceError::RecordNotFound(err.to_string())
            },
            GenesetTermError::AlreadyAttached(..) => ServiceError::RecordExists(err.to_string()),
            GenesetTermError::NotPermitted(_) => ServiceError::AccessForbidden,
            GenesetTermError::Geneset(e) => e,
            GenesetTermError::Database(e) => ServiceError::from(e),
        }
    }
}

/// Readable is not enough: only the owner or a curator may annotate.
async fn authorize<S: GenesetStore + ?Sized>(
    store: &S,
    user: &UserRecord,
    geneset_id: i64,
) -> Result<(), GenesetTermError> {
    readable_geneset(store, geneset_id, user).await?;
    if user.role.can_curate() || store.is_owner(geneset_id, user.id).await? {
        Ok(())
    } else {
        Err(GenesetTermError::NotPermitted(geneset_id))
    }
}

async fn term_id<S: OntologyStore + ?Sized>(store: &S, ref_id: &str) -> Result<i64, GenesetTermError> {
    let ref_id = ref_id.trim();
    if ref_id.is_empty() {
        return Err(GenesetTermError::EmptyTermId);
    }
    store
        .term_by_ref_id(ref_id)
        .await?
        .map(|term| term.ontology_id)
        .ok_or_else(|| GenesetTermError::TermNotFound(ref_id.to_string()))
}

#[tracing::instrument(skip(store, user), fields(user_id = user.id))]
pub async fn add<S>(store: &S, user: &UserRecord, command: AddGenesetTermCommand) -> Result<(), GenesetTermError>
where
    S: GenesetStore + OntologyStore + ?Sized,
{
    authorize(store, user, command.geneset_id).await?;
    let ontology_id = term_id(store, &command.ontology_id).await?;

    match store
        .add_geneset_term(command.geneset_id, ontology_id, PRIMARY_ANNOTATION)
        .await
    {
        Ok(()) => {},
        Err(DbError::Duplicate(_)) => {
            return Err(GenesetTermError::AlreadyAttached(command.ontology_id, command.geneset_id));
        },
        Err(e) => return Err(e.into()),
    }

    tracing::info!(geneset_id = command.geneset_id, ontology_id, "Ontology term attached");
    Ok(())
}

#[tracing::instrument(skip(store, user), fields(user_id = user.id))]
pub async fn remove<S>(
    store: &S,
    user: &UserRecord,
    command: RemoveGenesetTermCommand,
) -> Result<(), GenesetTermError>
where
    S: GenesetStore + OntologyStore + ?Sized,
{
    authorize(store, user, command.geneset_id).await?;
    let ontology_id = term_id(store, &command.ontology_id).await?;

    if !store.remove_geneset_term(command.geneset_id, ontology_id).await? {
        return Err(GenesetTermError::NotAttached(command.ontology_id, command.geneset_id));
    }

    tracing::info!(geneset_id = command.geneset_id, ontology_id, "Ontology term detached");
    Ok(())
}
