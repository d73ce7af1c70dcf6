//! Score header grammar
//!
//! ```text
//! Binary
//! P-Value < 0.001        Q-Value <= 0.05        P-Value
//! -0.5 < Correlation < 0.5
//! 1 < Effect < 12
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{GenesetScoreType, ScoreType};
use crate::types::geneset::DEFAULT_THRESHOLD;
use crate::GwError;

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

#[allow(clippy::expect_used)]
static SINGLE_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^([pq])[-\s]?values?(?:\s*<=?\s*({NUMBER}))?$"))
        .expect("single bound pattern compiles")
});

#[allow(clippy::expect_used)]
static RANGED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^({NUMBER})\s*<=?\s*(correlation|effect)\s*<=?\s*({NUMBER})$"
    ))
    .expect("ranged pattern compiles")
});

/// Parse the text of a `!` header into a validated score configuration.
pub fn parse_score(text: &str) -> Result<GenesetScoreType, GwError> {
    let text = text.trim();
    let invalid = || GwError::InvalidScore(format!("'{}'", text));

    let score = if text.eq_ignore_ascii_case("binary") {
        GenesetScoreType::binary()
    } else if let Some(caps) = SINGLE_BOUND.captures(text) {
        let score_type = if caps[1].eq_ignore_ascii_case("p") {
            ScoreType::PValue
        } else {
            ScoreType::QValue
        };
        let threshold = match caps.get(2) {
            Some(m) => m.as_str().parse::<f64>().map_err(|_| invalid())?,
            None => DEFAULT_THRESHOLD,
        };
        GenesetScoreType::new(score_type, threshold)
    } else if let Some(caps) = RANGED.captures(text) {
        let low = caps[1].parse::<f64>().map_err(|_| invalid())?;
        let high = caps[3].parse::<f64>().map_err(|_| invalid())?;
        let score_type = if caps[2].eq_ignore_ascii_case("correlation") {
            ScoreType::Correlation
        } else {
            ScoreType::Effect
        };
        GenesetScoreType::ranged(score_type, low, high)
    } else {
        return Err(invalid());
    };

    score.validate()?;
    Ok(score)
}
