//! Markdown report generation.
//!
//! This module generates Markdown crawl health reports from the
//! analysis results.

use crate::analysis::most_common_types;
use crate::models::{CrawlAnalysis, CrawlReport, RecommendationGroup, ReportMetadata, Severity};
use crate::recommendations::{has_specific_recommendations, partition_by_severity};
use anyhow::Result;

/// Markdown rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Recommendation groups rendered per severity bucket.
    pub top_per_severity: usize,
    /// Render the sample affected URLs under each group.
    pub include_affected_urls: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            top_per_severity: 5,
            include_affected_urls: true,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &CrawlReport, options: &MarkdownOptions) -> String {
    let mut output = String::new();

    output.push_str("# SeoScope Crawl Health Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata, &report.analysis));
    output.push_str(&generate_score_section(&report.analysis));
    output.push_str(&generate_summary_section(&report.analysis));
    output.push_str(&generate_recommendations_section(&report.analysis, options));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, analysis: &CrawlAnalysis) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if let Some(ref site) = metadata.site_url {
        section.push_str(&format!("- **Site:** {}\n", site));
    }
    if let Some(ref crawl_id) = metadata.crawl_id {
        section.push_str(&format!("- **Crawl:** `{}`\n", crawl_id));
    }
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Total Issues:** {}\n", analysis.total_issues));
    section.push_str(&format!("- **Pages Affected:** {}\n", analysis.pages_affected));
    if metadata.source_pages > 1 {
        section.push_str(&format!("- **Input Pages:** {}\n", metadata.source_pages));
    }
    section.push('\n');

    section
}

/// Generate the health score section.
fn generate_score_section(analysis: &CrawlAnalysis) -> String {
    let mut section = String::new();

    section.push_str("## Health Score\n\n");
    section.push_str(&format!(
        "**{}/100** ({})\n\n",
        analysis.health_score, analysis.grade
    ));

    section
}

/// Generate the summary section.
fn generate_summary_section(analysis: &CrawlAnalysis) -> String {
    let mut section = String::new();
    let counts = &analysis.severity_counts;

    section.push_str("## Summary\n\n");

    section.push_str("### Issue Severity Breakdown\n\n");
    section.push_str(&format!(
        "| {} High | {} Medium | {} Low | **Total** |\n",
        Severity::High.emoji(),
        Severity::Medium.emoji(),
        Severity::Low.emoji(),
    ));
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | **{}** |\n\n",
        counts.high, counts.medium, counts.low, analysis.total_issues
    ));
    if counts.unrecognized > 0 {
        section.push_str(&format!(
            "*{} issue(s) had no recognized severity and were not scored.*\n\n",
            counts.unrecognized
        ));
    }

    let types = most_common_types(&analysis.groups, analysis.groups.len());
    if !types.is_empty() {
        section.push_str("### Issues by Type\n\n");
        section.push_str("| Issue Type | Count |\n");
        section.push_str("|:---|:---:|\n");

        for (issue_type, count) in types {
            section.push_str(&format!("| `{}` | {} |\n", issue_type, count));
        }
        section.push('\n');
    }

    section
}

/// Generate the recommendations section, one subsection per severity.
fn generate_recommendations_section(analysis: &CrawlAnalysis, options: &MarkdownOptions) -> String {
    let mut section = String::new();

    section.push_str("## Recommendations\n\n");

    if analysis.recommendations.is_empty() {
        section.push_str("No technical issues were found in this crawl. 🎉\n\n");
        return section;
    }

    let all = partition_by_severity(&analysis.recommendations);
    let shown = all.clone().top(options.top_per_severity);

    for ((severity, groups), (_, full)) in shown.iter().zip(all.iter()) {
        if full.is_empty() {
            continue;
        }

        let heading = match severity {
            Some(s) => format!("{} {} Priority", s.emoji(), s),
            None => "⚪ Unclassified".to_string(),
        };
        section.push_str(&format!("### {}

", heading));

        for group in groups {
            section.push_str(&generate_group_block(group, options.include_affected_urls));
        }

        let hidden = full.len() - groups.len();
        if hidden > 0 {
            section.push_str(&format!(
                "*{} more issue type(s) at this severity not shown.*\n\n",
                hidden
            ));
        }
    }

    section
}

/// Generate a single recommendation group block.
fn generate_group_block(group: &RecommendationGroup, include_urls: bool) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "#### {} ({} issue{})\n\n",
        group.title,
        group.issue_count,
        if group.issue_count == 1 { "" } else { "s" }
    ));

    if !group.description.is_empty() {
        block.push_str(&format!("{}\n\n", group.description));
    }

    for rec in &group.recommendations {
        block.push_str(&format!("- {}\n", rec));
    }
    block.push('\n');

    if !has_specific_recommendations(&group.issue_type) {
        block.push_str("*General guidance: no specific advice for this issue type yet.*\n\n");
    }

    if include_urls && !group.affected_urls.is_empty() {
        block.push_str("**Affected pages:**\n\n");
        for url in &group.affected_urls {
            block.push_str(&format!("- <{}>\n", url));
        }
        if group.additional_urls > 0 {
            block.push_str(&format!("- *+{} more*\n", group.additional_urls));
        }
        block.push('\n');
    }

    block.push_str("---\n\n");

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    "*Report generated by SeoScope*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &CrawlReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisOptions};
    use crate::models::TechnicalIssue;
    use chrono::Utc;

    fn create_test_report(issues: &[TechnicalIssue]) -> CrawlReport {
        CrawlReport {
            metadata: ReportMetadata {
                crawl_id: Some("crawl-42".to_string()),
                site_url: Some("https://example.com".to_string()),
                generated_at: Utc::now(),
                source_pages: 1,
            },
            analysis: analyze(issues, &AnalysisOptions::default()),
        }
    }

    fn sample_issues() -> Vec<TechnicalIssue> {
        let mut issues: Vec<TechnicalIssue> = (0..5)
            .map(|i| {
                TechnicalIssue::new(
                    i.to_string(),
                    format!("https://example.com/{}", i),
                    "broken_link",
                    Severity::High,
                    "Broken link: target returns 404",
                )
            })
            .collect();
        issues.push(TechnicalIssue::new(
            "m1",
            "https://example.com/",
            "missing_meta_description",
            Severity::Medium,
            "Missing meta description",
        ));
        issues.push(TechnicalIssue {
            issue_type: Some("custom_weird_issue".to_string()),
            ..Default::default()
        });
        issues
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(&sample_issues());
        let markdown = generate_markdown_report(&report, &MarkdownOptions::default());

        assert!(markdown.contains("# SeoScope Crawl Health Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("https://example.com"));
        assert!(markdown.contains("`crawl-42`"));
        assert!(markdown.contains("**73/100** (Fair)"));
        assert!(markdown.contains("### 🔴 High Priority"));
        assert!(markdown.contains("#### Broken Link (5 issues)"));
        assert!(markdown.contains("- *+2 more*"));
        assert!(markdown.contains("### ⚪ Unclassified"));
        assert!(markdown.contains("Custom Weird Issue"));
        assert_eq!(markdown.matches("*General guidance:").count(), 1);
        assert!(markdown.contains("1 issue(s) had no recognized severity"));
    }

    #[test]
    fn test_markdown_empty_crawl() {
        let report = create_test_report(&[]);
        let markdown = generate_markdown_report(&report, &MarkdownOptions::default());

        assert!(markdown.contains("**100/100** (Good)"));
        assert!(markdown.contains("No technical issues were found"));
        assert!(!markdown.contains("### Issues by Type"));
    }

    #[test]
    fn test_markdown_respects_options() {
        let report = create_test_report(&sample_issues());
        let options = MarkdownOptions {
            top_per_severity: 0,
            include_affected_urls: false,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(!markdown.contains("#### Broken Link"));
        assert!(markdown.contains("1 more issue type(s) at this severity not shown."));
        assert!(!markdown.contains("Affected pages"));
    }

    #[test]
    fn test_generate_group_block() {
        let group = RecommendationGroup {
            issue_type: "missing_title".to_string(),
            title: "Missing Title".to_string(),
            description: "Page has no title".to_string(),
            severity: Some(Severity::High),
            issue_count: 1,
            recommendations: vec!["Add a title".to_string()],
            affected_urls: vec!["https://example.com/a".to_string()],
            additional_urls: 0,
        };

        let block = generate_group_block(&group, true);
        assert!(block.contains("#### Missing Title (1 issue)"));
        assert!(block.contains("- Add a title"));
        assert!(block.contains("<https://example.com/a>"));
        assert!(!block.contains("more*"));
        assert!(!block.contains("General guidance"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(&sample_issues());
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"crawl_id\""));
        assert!(json.contains("\"health_score\": 73"));
        assert!(json.contains("\"grade\": \"fair\""));
        assert!(json.contains("\"recommendations\""));
        assert!(json.contains("\"additional_urls\": 2"));
    }
}
