//! Crawl issue analysis.
//!
//! Grouping, severity counting and health scoring, plus [`analyze`], which
//! runs the whole pipeline over one crawl's issue list.

pub mod aggregator;
pub mod score;

pub use aggregator::*;
pub use score::*;

use crate::models::{CrawlAnalysis, GroupSeverityPolicy, TechnicalIssue};
use crate::recommendations::build_recommendations;
use tracing::debug;

/// Affected URLs shown per recommendation group by default.
pub const DEFAULT_MAX_URLS: usize = 3;

/// Knobs for a full analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub weights: ScoreWeights,
    pub group_severity: GroupSeverityPolicy,
    /// Cap on affected URLs carried by each recommendation group.
    pub max_urls: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            group_severity: GroupSeverityPolicy::default(),
            max_urls: DEFAULT_MAX_URLS,
        }
    }
}

/// Run grouping, counting, scoring and recommendation generation once.
///
/// Pure: the same input and options always give the same output.
pub fn analyze(issues: &[TechnicalIssue], options: &AnalysisOptions) -> CrawlAnalysis {
    let severity_counts = count_by_severity(issues);
    let health_score = score_from_counts(&severity_counts, &options.weights);
    let groups = group_by_type_with(issues, options.group_severity);
    let recommendations = build_recommendations(groups.as_slice(), options.max_urls);

    debug!(
        "Analyzed {} issues: score {}, {} groups",
        issues.len(),
        health_score,
        groups.len()
    );

    CrawlAnalysis {
        total_issues: issues.len(),
        pages_affected: pages_affected(issues),
        health_score,
        grade: HealthGrade::from_score(health_score),
        severity_counts,
        groups: groups.into_vec(),
        recommendations,
    }
}
