//! Geneset vocabularies: curation tiers, score types and access

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::coded_enum;
use crate::GwError;

coded_enum! {
    /// Curation tier of a geneset. Tier 5 holds private, uncurated sets.
    pub enum GenesetTier ("curation tier") {
        Tier1 = 1 => "Tier I: Public Resource Grade",
        Tier2 = 2 => "Tier II: Pro-Curated",
        Tier3 = 3 => "Tier III: Curated",
        Tier4 = 4 => "Tier IV: Provisional",
        Tier5 = 5 => "Tier V: Private",
    }
}

impl GenesetTier {
    /// Tiers any caller may read, authenticated or not.
    pub fn public() -> BTreeSet<GenesetTier> {
        Self::ALL
            .iter()
            .copied()
            .filter(|tier| *tier != GenesetTier::Tier5)
            .collect()
    }
}

coded_enum! {
    pub enum ScoreType ("score type") {
        PValue = 1 => "p-value",
        QValue = 2 => "q-value",
        Binary = 3 => "binary",
        Correlation = 4 => "correlation",
        Effect = 5 => "effect",
    }
}

impl ScoreType {
    /// Score types bounded on both sides carry a lower threshold.
    pub fn is_ranged(self) -> bool {
        matches!(self, ScoreType::Correlation | ScoreType::Effect)
    }
}

pub const DEFAULT_THRESHOLD: f64 = 0.05;

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Score configuration of a geneset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenesetScoreType {
    pub score_type: ScoreType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_low: Option<f64>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl GenesetScoreType {
    pub fn new(score_type: ScoreType, threshold: f64) -> Self {
        Self {
            score_type,
            threshold_low: None,
            threshold,
        }
    }

    pub fn binary() -> Self {
        Self::new(ScoreType::Binary, 1.0)
    }

    pub fn ranged(score_type: ScoreType, low: f64, high: f64) -> Self {
        Self {
            score_type,
            threshold_low: Some(low),
            threshold: high,
        }
    }

    pub fn validate(&self) -> Result<(), GwError> {
        if !self.threshold.is_finite() || self.threshold_low.is_some_and(|low| !low.is_finite()) {
            return Err(GwError::InvalidScore("thresholds must be finite numbers".into()));
        }

        match self.score_type {
            ScoreType::PValue | ScoreType::QValue => {
                if self.threshold <= 0.0 || self.threshold > 1.0 {
                    return Err(GwError::InvalidScore(format!(
                        "{} threshold must be in (0, 1], got {}",
                        self.score_type, self.threshold
                    )));
                }
                if self.threshold_low.is_some() {
                    return Err(GwError::InvalidScore(format!(
                        "{} does not take a lower threshold",
                        self.score_type
                    )));
                }
            },
            ScoreType::Correlation | ScoreType::Effect => {
                if let Some(low) = self.threshold_low {
                    if low > self.threshold {
                        return Err(GwError::InvalidScore(format!(
                            "lower threshold {} exceeds upper threshold {}",
                            low, self.threshold
                        )));
                    }
                }
            },
            ScoreType::Binary => {},
        }

        Ok(())
    }

    /// Decode the stored `(gs_threshold_type, gs_threshold)` pair.
    ///
    /// Ranged types store `"low,high"`; the rest store a single number.
    /// An empty threshold falls back to the default.
    pub fn from_stored(type_code: i32, threshold: Option<&str>) -> Result<Self, GwError> {
        let score_type = ScoreType::try_from(type_code)?;
        let raw = threshold.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(Self::new(score_type, DEFAULT_THRESHOLD));
        }

        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| GwError::InvalidScore(format!("stored threshold '{}'", raw)))
        };

        match raw.split_once(',') {
            Some((low, high)) => Ok(Self::ranged(score_type, parse(low)?, parse(high)?)),
            None => Ok(Self::new(score_type, parse(raw)?)),
        }
    }

    /// Inverse of [`GenesetScoreType::from_stored`] for the threshold column.
    pub fn stored_threshold(&self) -> String {
        match self.threshold_low {
            Some(low) => format!("{},{}", low, self.threshold),
            None => self.threshold.to_string(),
        }
    }
}

/// Visibility requested for an uploaded geneset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenesetAccess {
    #[default]
    Private,
    Public,
}

impl std::str::FromStr for GenesetAccess {
    type Err = GwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(GenesetAccess::Private),
            "public" => Ok(GenesetAccess::Public),
            _ => Err(GwError::unknown_name("access level", s.trim())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_public_tiers_exclude_tier5() {
        let public = GenesetTier::public();
        assert_eq!(public.len(), 4);
        assert!(!public.contains(&GenesetTier::Tier5));
    }

    #[test]
    fn test_score_type_defaults_threshold() {
        let score: GenesetScoreType = serde_json::from_str(r#"{"score_type": 1}"#).unwrap();
        assert_eq!(score.score_type, ScoreType::PValue);
        assert_eq!(score.threshold, DEFAULT_THRESHOLD);
        assert!(score.threshold_low.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(GenesetScoreType::new(ScoreType::PValue, 0.001).validate().is_ok());
        assert!(GenesetScoreType::new(ScoreType::QValue, 1.5).validate().is_err());
        assert!(GenesetScoreType::new(ScoreType::PValue, 0.0).validate().is_err());
        assert!(GenesetScoreType::ranged(ScoreType::Effect, -1.0, 2.0).validate().is_ok());
        assert!(GenesetScoreType::ranged(ScoreType::Correlation, 0.9, 0.1).validate().is_err());
        assert!(GenesetScoreType::new(ScoreType::Binary, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_stored_threshold_forms() {
        let p = GenesetScoreType::from_stored(1, Some("0.001")).unwrap();
        assert_eq!(p, GenesetScoreType::new(ScoreType::PValue, 0.001));

        let c = GenesetScoreType::from_stored(4, Some("-0.5,0.75")).unwrap();
        assert_eq!(c.threshold_low, Some(-0.5));
        assert_eq!(c.threshold, 0.75);
        assert_eq!(c.stored_threshold(), "-0.5,0.75");

        let b = GenesetScoreType::from_stored(3, None).unwrap();
        assert_eq!(b.threshold, DEFAULT_THRESHOLD);

        assert!(GenesetScoreType::from_stored(9, Some("1")).is_err());
        assert!(GenesetScoreType::from_stored(1, Some("abc")).is_err());
    }

    #[test]
    fn test_access_from_str() {
        assert_eq!("Private".parse::<GenesetAccess>().unwrap(), GenesetAccess::Private);
        assert_eq!(" PUBLIC ".parse::<GenesetAccess>().unwrap(), GenesetAccess::Public);
        assert!("shared".parse::<GenesetAccess>().is_err());
    }
}
