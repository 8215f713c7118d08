//! Data models for the crawl auditor.
//!
//! This module contains the core data structures used throughout
//! the crate for representing crawl issues, issue groups, recommendation
//! groups and the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Issue type used when a record arrives without one.
pub const UNKNOWN_ISSUE_TYPE: &str = "unknown";

/// Severity level of a technical issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low severity - minor polish, little ranking impact
    Low,
    /// Medium severity - hurts crawlability or snippets
    Medium,
    /// High severity - blocks indexing or breaks pages
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

impl Severity {
    /// Parse a severity label. Returns `None` for anything outside
    /// `high | medium | low` (case-insensitive, surrounding whitespace ignored).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }

    /// Returns an emoji representation of the severity.
    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Low => "🟢",
            Severity::Medium => "🟡",
            Severity::High => "🔴",
        }
    }
}

/// Accepts any JSON value for a severity; unrecognized labels and
/// non-string values become `None` instead of failing the whole record.
fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| v.as_str()).and_then(Severity::parse))
}

/// Accepts any JSON value for a text field; non-strings become `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A single technical problem detected on one page during a crawl.
///
/// Every field is optional on the wire. A crawler's output cannot be fully
/// trusted, so missing or mistyped fields fall back to defaults instead of
/// rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIssue {
    /// Opaque identifier, unique within a crawl.
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    /// URL of the page the issue was found on.
    #[serde(
        default,
        rename = "pageUrl",
        alias = "page_url",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_url: Option<String>,
    /// Open-ended category key such as `missing_title`.
    #[serde(
        default,
        rename = "issueType",
        alias = "issue_type",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub issue_type: Option<String>,
    /// Recognized severity, `None` when absent or unrecognized.
    #[serde(
        default,
        alias = "issue_severity",
        deserialize_with = "lenient_severity",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<Severity>,
    /// Free text, conventionally `"<summary>: <detail>"`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

impl TechnicalIssue {
    /// Creates a fully populated issue.
    pub fn new(
        id: impl Into<String>,
        page_url: impl Into<String>,
        issue_type: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            page_url: Some(page_url.into()),
            issue_type: Some(issue_type.into()),
            severity: Some(severity),
            description: Some(description.into()),
        }
    }

    /// The grouping key, `"unknown"` when missing or blank.
    pub fn issue_type_key(&self) -> &str {
        match self.issue_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => UNKNOWN_ISSUE_TYPE,
        }
    }

    /// The page URL, `None` when missing or blank.
    pub fn page(&self) -> Option<&str> {
        self.page_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// The description text, empty when missing.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// The part of the description before the first `:`, trimmed.
    /// Falls back to the whole (trimmed) description when there is no `:`.
    pub fn summary(&self) -> &str {
        let text = self.description_text();
        match text.split_once(':') {
            Some((head, _)) => head.trim(),
            None => text.trim(),
        }
    }
}

/// Per-severity tallies for one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Issues whose severity was missing or not one of the three labels.
    /// Never included in `high + medium + low`.
    pub unrecognized: usize,
}

impl SeverityCounts {
    /// Number of issues with a recognized severity.
    pub fn classified(&self) -> usize {
        self.high + self.medium + self.low
    }

    /// Count for one severity bucket.
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// All issues of a crawl that share one issue type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueGroup {
    /// Grouping key as seen in the input.
    pub issue_type: String,
    /// Issue type in Title Case, e.g. `Missing Meta Description`.
    pub title: String,
    /// Summary segment of the first issue's description.
    pub description: String,
    /// Group severity, chosen by the active [`GroupSeverityPolicy`].
    pub severity: Option<Severity>,
    /// Number of source issues with this type.
    pub count: usize,
    /// Distinct affected page URLs in first-seen order.
    pub affected_urls: Vec<String>,
}

/// How a group's severity is chosen when its members disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSeverityPolicy {
    /// The first member's severity wins, even if later members differ.
    #[default]
    FirstSeen,
    /// The highest recognized severity among the members wins.
    Highest,
}

/// An issue group paired with remediation guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
    pub issue_type: String,
    pub title: String,
    pub description: String,
    pub severity: Option<Severity>,
    pub issue_count: usize,
    /// Remediation bullets from the knowledge table, or the generic fallback.
    pub recommendations: Vec<String>,
    /// Sample of distinct affected URLs, capped by the caller.
    pub affected_urls: Vec<String>,
    /// Distinct affected URLs left out of `affected_urls`.
    pub additional_urls: usize,
}

/// Everything the engine derives from one crawl's issue list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlAnalysis {
    pub total_issues: usize,
    /// Distinct pages carrying at least one issue.
    pub pages_affected: usize,
    pub health_score: u8,
    pub grade: crate::analysis::HealthGrade,
    pub severity_counts: SeverityCounts,
    pub groups: Vec<IssueGroup>,
    pub recommendations: Vec<RecommendationGroup>,
}

/// Metadata about a crawl report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Identifier of the crawl, if the caller supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl_id: Option<String>,
    /// Site the crawl covered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of input pages (files) the issues were read from.
    pub source_pages: usize,
}

/// The complete crawl health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub metadata: ReportMetadata,
    pub analysis: CrawlAnalysis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("high"), Some(Severity::High));
        assert_eq!(Severity::parse(" Medium "), Some(Severity::Medium));
        assert_eq!(Severity::parse("LOW"), Some(Severity::Low));
        assert_eq!(Severity::parse("critical"), None);
        assert_eq!(Severity::parse(""), None);
    }

    #[test]
    fn test_issue_deserialize_camel_and_snake() {
        let camel: TechnicalIssue = serde_json::from_str(
            r#"{"id":"1","pageUrl":"https://a.test/","issueType":"missing_h1","severity":"high","description":"No H1: page has no heading"}"#,
        )
        .unwrap();
        let snake: TechnicalIssue = serde_json::from_str(
            r#"{"id":"1","page_url":"https://a.test/","issue_type":"missing_h1","issue_severity":"high","description":"No H1: page has no heading"}"#,
        )
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.severity, Some(Severity::High));
    }

    #[test]
    fn test_issue_deserialize_tolerates_junk() {
        let issue: TechnicalIssue =
            serde_json::from_str(r#"{"severity":"urgent","issueType":42,"pageUrl":null}"#)
                .unwrap();
        assert_eq!(issue.severity, None);
        assert_eq!(issue.issue_type.as_deref(), Some("42"));
        assert_eq!(issue.page(), None);
        assert_eq!(issue.description_text(), "");

        let empty: TechnicalIssue = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.issue_type_key(), UNKNOWN_ISSUE_TYPE);
    }

    #[test]
    fn test_issue_summary() {
        let mut issue = TechnicalIssue::new(
            "1",
            "https://a.test/",
            "missing_title",
            Severity::High,
            "  Missing title : the page has no <title>",
        );
        assert_eq!(issue.summary(), "Missing title");

        issue.description = Some(" No delimiter here ".to_string());
        assert_eq!(issue.summary(), "No delimiter here");

        issue.description = None;
        assert_eq!(issue.summary(), "");
    }

    #[test]
    fn test_blank_fields_fall_back() {
        let issue = TechnicalIssue {
            issue_type: Some("   ".to_string()),
            page_url: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(issue.issue_type_key(), UNKNOWN_ISSUE_TYPE);
        assert_eq!(issue.page(), None);
    }

    #[test]
    fn test_severity_counts_classified() {
        let counts = SeverityCounts {
            high: 2,
            medium: 3,
            low: 4,
            unrecognized: 7,
        };
        assert_eq!(counts.classified(), 9);
        assert_eq!(counts.get(Severity::Medium), 3);
    }
}
