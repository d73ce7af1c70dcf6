use gw_common::types::{GenesetScoreType, ScoreType};
use gw_common::GwError;
use serde::{Deserialize, Serialize};

use crate::db::DbError;
use crate::error::ServiceError;
use crate::store::{GenesetStore, UserRecord};

/// Body of `PUT /genesets/:id/threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateThresholdCommand {
    pub score_type: ScoreType,
    #[serde(default)]
    pub threshold_low: Option<f64>,
    pub threshold: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateThresholdError {
    #[error("Invalid threshold: {0}")]
    InvalidScore(#[from] GwError),
    #[error("Geneset '{0}' not found")]
    NotFound(i64),
    #[error("Only the owner may change the threshold of geneset '{0}'")]
    NotOwner(i64),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<UpdateThresholdError> for ServiceError {
    fn from(err: UpdateThresholdError) -> Self {
        match err {
            UpdateThresholdError::InvalidScore(e) => ServiceError::validation(e.to_string()),
            UpdateThresholdError::NotFound(id) => ServiceError::not_found("Geneset", id),
            UpdateThresholdError::NotOwner(_) => ServiceError::AccessForbidden,
            UpdateThresholdError::Database(e) => ServiceError::from(e),
        }
    }
}

impl UpdateThresholdCommand {
    pub fn score(&self) -> GenesetScoreType {
        GenesetScoreType {
            score_type: self.score_type,
            threshold_low: self.threshold_low,
            threshold: self.threshold,
        }
    }

    pub fn validate(&self) -> Result<GenesetScoreType, UpdateThresholdError> {
        let score = self.score();
        score.validate()?;
        Ok(score)
    }
}

#[tracing::instrument(skip(store, user, command), fields(user_id = user.id))]
pub async fn handle<S: GenesetStore + ?Sized>(
    store: &S,
    user: &UserRecord,
    geneset_id: i64,
    command: UpdateThresholdCommand,
) -> Result<(), UpdateThresholdError> {
    let score = command.validate()?;

    if !store.geneset_exists(geneset_id).await? {
        return Err(UpdateThresholdError::NotFound(geneset_id));
    }
    if !store.is_owner(geneset_id, user.id).await? {
        return Err(UpdateThresholdError::NotOwner(geneset_id));
    }

    store.update_threshold(geneset_id, &score).await?;

    tracing::info!(
        geneset_id,
        score_type = %score.score_type,
        threshold = score.threshold,
        "Geneset threshold updated"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::memory::{sample_geneset, MemoryStore};
    use gw_common::types::{AppRole, GenesetTier, Species};

    fn user(id: i64) -> UserRecord {
        UserRecord {
            id,
            email: "owner@example.org".into(),
            name: None,
            role: AppRole::Admin,
        }
    }

    fn pvalue(threshold: f64) -> UpdateThresholdCommand {
        UpdateThresholdCommand {
            score_type: ScoreType::PValue,
            threshold_low: None,
            threshold,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_geneset(sample_geneset(7, 1, GenesetTier::Tier3, Species::MusMusculus))
    }

    #[tokio::test]
    async fn test_owner_updates_threshold() {
        let store = store();
        handle(&store, &user(1), 7, pvalue(0.01)).await.unwrap();
        let score = store.geneset(7).unwrap().score;
        assert_eq!(score, GenesetScoreType::new(ScoreType::PValue, 0.01));
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_even_for_admins() {
        let err = handle(&store(), &user(2), 7, pvalue(0.01)).await.unwrap_err();
        assert!(matches!(err, UpdateThresholdError::NotOwner(7)));
        assert_eq!(ServiceError::from(err).kind(), ErrorKind::AccessForbidden);
    }

    #[tokio::test]
    async fn test_missing_geneset() {
        let err = handle(&store(), &user(1), 99, pvalue(0.01)).await.unwrap_err();
        assert_eq!(ServiceError::from(err).kind(), ErrorKind::RecordNotFound);
    }

    #[tokio::test]
    async fn test_invalid_threshold_is_rejected_before_lookup() {
        let err = handle(&store(), &user(2), 7, pvalue(1.5)).await.unwrap_err();
        assert!(matches!(err, UpdateThresholdError::InvalidScore(_)));

        let inverted = UpdateThresholdCommand {
            score_type: ScoreType::Correlation,
            threshold_low: Some(0.9),
            threshold: 0.1,
        };
        assert!(inverted.validate().is_err());
    }
}
