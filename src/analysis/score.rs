//! Health score calculation.
//!
//! The score is a severity-weighted linear penalty: start at 100, subtract
//! a fixed weight per issue, clamp to `[0, 100]` and round.

use crate::error::SeoScopeError;
use crate::models::{SeverityCounts, TechnicalIssue};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::aggregator::count_by_severity;

/// Score of a crawl with no issues.
pub const MAX_SCORE: u8 = 100;

/// Points deducted per issue of each severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_high_weight")]
    pub high_weight: f64,
    #[serde(default = "default_medium_weight")]
    pub medium_weight: f64,
    #[serde(default = "default_low_weight")]
    pub low_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            high_weight: default_high_weight(),
            medium_weight: default_medium_weight(),
            low_weight: default_low_weight(),
        }
    }
}

fn default_high_weight() -> f64 {
    5.0
}

fn default_medium_weight() -> f64 {
    2.0
}

fn default_low_weight() -> f64 {
    0.5
}

impl ScoreWeights {
    /// Reject weights that would let an extra issue raise the score.
    pub fn validate(&self) -> Result<(), SeoScopeError> {
        for (name, weight) in [
            ("high_weight", self.high_weight),
            ("medium_weight", self.medium_weight),
            ("low_weight", self.low_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SeoScopeError::InvalidConfig(format!(
                    "scoring.{} must be a finite, non-negative number (got {})",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Coarse label for a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthGrade {
    Critical,
    Poor,
    Fair,
    Good,
}

impl HealthGrade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => HealthGrade::Good,
            70..=89 => HealthGrade::Fair,
            50..=69 => HealthGrade::Poor,
            _ => HealthGrade::Critical,
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthGrade::Critical => write!(f, "Critical"),
            HealthGrade::Poor => write!(f, "Poor"),
            HealthGrade::Fair => write!(f, "Fair"),
            HealthGrade::Good => write!(f, "Good"),
        }
    }
}

/// Compute the health score of an issue list with the default weights.
pub fn compute_health_score(issues: &[TechnicalIssue]) -> u8 {
    score_from_counts(&count_by_severity(issues), &ScoreWeights::default())
}

/// Compute the health score of an issue list with custom weights.
pub fn compute_health_score_with(issues: &[TechnicalIssue], weights: &ScoreWeights) -> u8 {
    score_from_counts(&count_by_severity(issues), weights)
}

/// Compute the health score from precomputed severity counts.
///
/// Unrecognized severities carry no penalty.
pub fn score_from_counts(counts: &SeverityCounts, weights: &ScoreWeights) -> u8 {
    let penalty = weights.high_weight * counts.high as f64
        + weights.medium_weight * counts.medium as f64
        + weights.low_weight * counts.low as f64;

    let raw = (f64::from(MAX_SCORE) - penalty).clamp(0.0, f64::from(MAX_SCORE));

    // NaN from unvalidated weights saturates to 0 on the cast.
    raw.round() as u8
}
