//! Issue aggregation and statistics.
//!
//! Groups a crawl's issues by type and tallies them by severity. Every
//! function here is a pure pass over the input slice.

use crate::models::{GroupSeverityPolicy, IssueGroup, Severity, SeverityCounts, TechnicalIssue};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Issue groups keyed by issue type, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueGroups {
    groups: Vec<IssueGroup>,
    index: HashMap<String, usize>,
}

impl IssueGroups {
    /// Look up the group for an issue type.
    pub fn get(&self, issue_type: &str) -> Option<&IssueGroup> {
        self.index.get(issue_type).map(|&i| &self.groups[i])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in the order their type was first encountered.
    pub fn iter(&self) -> impl Iterator<Item = &IssueGroup> {
        self.groups.iter()
    }

    pub fn as_slice(&self) -> &[IssueGroup] {
        &self.groups
    }

    pub fn into_vec(self) -> Vec<IssueGroup> {
        self.groups
    }
}

/// Convert a snake_case issue type to Title Case.
///
/// `missing_meta_description` becomes `Missing Meta Description`. Empty
/// segments from doubled or trailing underscores are dropped.
pub fn format_title(issue_type: &str) -> String {
    issue_type
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Group issues by type, with the first member's severity as group severity.
pub fn group_by_type(issues: &[TechnicalIssue]) -> IssueGroups {
    group_by_type_with(issues, GroupSeverityPolicy::FirstSeen)
}

/// Group issues by type using the given severity policy.
pub fn group_by_type_with(issues: &[TechnicalIssue], policy: GroupSeverityPolicy) -> IssueGroups {
    let mut grouped = IssueGroups::default();
    let mut seen_urls: Vec<HashSet<String>> = Vec::new();

    for issue in issues {
        let key = issue.issue_type_key();

        let slot = match grouped.index.get(key) {
            Some(&slot) => {
                let group = &mut grouped.groups[slot];
                group.count += 1;
                if policy == GroupSeverityPolicy::Highest {
                    group.severity = group.severity.max(issue.severity);
                }
                slot
            }
            None => {
                let slot = grouped.groups.len();
                grouped.groups.push(IssueGroup {
                    issue_type: key.to_string(),
                    title: format_title(key),
                    description: issue.summary().to_string(),
                    severity: issue.severity,
                    count: 1,
                    affected_urls: Vec::new(),
                });
                grouped.index.insert(key.to_string(), slot);
                seen_urls.push(HashSet::new());
                slot
            }
        };

        if let Some(url) = issue.page() {
            if seen_urls[slot].insert(url.to_string()) {
                grouped.groups[slot].affected_urls.push(url.to_string());
            }
        }
    }

    debug!(
        "Grouped {} issues into {} issue types",
        issues.len(),
        grouped.len()
    );

    grouped
}

/// Count issues by severity.
///
/// Issues without a recognized severity go to `unrecognized` and never
/// touch the high/medium/low buckets.
pub fn count_by_severity(issues: &[TechnicalIssue]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();

    for issue in issues {
        match issue.severity {
            Some(Severity::High) => counts.high += 1,
            Some(Severity::Medium) => counts.medium += 1,
            Some(Severity::Low) => counts.low += 1,
            None => counts.unrecognized += 1,
        }
    }

    counts
}

/// Number of distinct page URLs carrying at least one issue.
pub fn pages_affected(issues: &[TechnicalIssue]) -> usize {
    issues
        .iter()
        .filter_map(TechnicalIssue::page)
        .collect::<HashSet<_>>()
        .len()
}

/// Issue types ordered by how often they occur (most frequent first).
/// Ties keep first-seen order.
pub fn most_common_types(groups: &[IssueGroup], n: usize) -> Vec<(&str, usize)> {
    let mut types: Vec<_> = groups
        .iter()
        .map(|g| (g.issue_type.as_str(), g.count))
        .collect();

    types.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    types.truncate(n);

    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_issue(issue_type: &str, severity: Severity, url: &str) -> TechnicalIssue {
        TechnicalIssue::new(
            format!("{}-{}", issue_type, url),
            url,
            issue_type,
            severity,
            format!("{}: detail", format_title(issue_type)),
        )
    }

    #[test]
    fn test_format_title() {
        assert_eq!(
            format_title("missing_meta_description"),
            "Missing Meta Description"
        );
        assert_eq!(format_title("custom_weird_issue"), "Custom Weird Issue");
        assert_eq!(format_title("slow"), "Slow");
        assert_eq!(format_title("missing__h1_"), "Missing H1");
        assert_eq!(format_title(""), "");
    }

    #[test]
    fn test_group_by_type_empty() {
        let groups = group_by_type(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.len(), 0);
    }

    #[test]
    fn test_group_by_type_counts_and_order() {
        let issues = vec![
            create_test_issue("broken_link", Severity::High, "https://a.test/1"),
            create_test_issue("missing_h1", Severity::Medium, "https://a.test/1"),
            create_test_issue("broken_link", Severity::High, "https://a.test/2"),
            create_test_issue("broken_link", Severity::High, "https://a.test/1"),
        ];

        let groups = group_by_type(&issues);
        let types: Vec<_> = groups.iter().map(|g| g.issue_type.as_str()).collect();
        assert_eq!(types, vec!["broken_link", "missing_h1"]);

        let broken = groups.get("broken_link").unwrap();
        assert_eq!(broken.count, 3);
        assert_eq!(broken.title, "Broken Link");
        assert_eq!(broken.description, "Broken Link");
        assert_eq!(
            broken.affected_urls,
            vec!["https://a.test/1".to_string(), "https://a.test/2".to_string()]
        );

        let total: usize = groups.iter().map(|g| g.count).sum();
        assert_eq!(total, issues.len());
    }

    #[test]
    fn test_group_severity_first_seen_wins() {
        let issues = vec![
            create_test_issue("slow_page", Severity::Low, "https://a.test/1"),
            create_test_issue("slow_page", Severity::High, "https://a.test/2"),
        ];

        let groups = group_by_type(&issues);
        assert_eq!(groups.get("slow_page").unwrap().severity, Some(Severity::Low));
    }

    #[test]
    fn test_group_severity_highest() {
        let mut unknown = create_test_issue("slow_page", Severity::Low, "https://a.test/0");
        unknown.severity = None;
        let issues = vec![
            unknown,
            create_test_issue("slow_page", Severity::Medium, "https://a.test/1"),
            create_test_issue("slow_page", Severity::High, "https://a.test/2"),
            create_test_issue("slow_page", Severity::Low, "https://a.test/3"),
        ];

        let groups = group_by_type_with(&issues, GroupSeverityPolicy::Highest);
        assert_eq!(
            groups.get("slow_page").unwrap().severity,
            Some(Severity::High)
        );
    }

    #[test]
    fn test_malformed_issues_are_grouped_not_dropped() {
        let issues = vec![
            TechnicalIssue::default(),
            TechnicalIssue {
                description: Some("Something odd".to_string()),
                ..Default::default()
            },
        ];

        let groups = group_by_type(&issues);
        let unknown = groups.get("unknown").unwrap();
        assert_eq!(unknown.count, 2);
        assert_eq!(unknown.title, "Unknown");
        assert_eq!(unknown.description, "");
        assert!(unknown.affected_urls.is_empty());
        assert_eq!(unknown.severity, None);
    }

    #[test]
    fn test_count_by_severity() {
        let mut bogus = create_test_issue("x", Severity::Low, "https://a.test/");
        bogus.severity = None;
        let issues = vec![
            create_test_issue("a", Severity::High, "https://a.test/"),
            create_test_issue("b", Severity::High, "https://a.test/"),
            create_test_issue("c", Severity::Medium, "https://a.test/"),
            create_test_issue("d", Severity::Low, "https://a.test/"),
            bogus,
        ];

        let counts = count_by_severity(&issues);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.medium, 1);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.unrecognized, 1);
        assert!(counts.classified() <= issues.len());
    }

    #[test]
    fn test_pages_affected() {
        let issues = vec![
            create_test_issue("a", Severity::High, "https://a.test/1"),
            create_test_issue("b", Severity::Low, "https://a.test/1"),
            create_test_issue("c", Severity::Low, "https://a.test/2"),
            TechnicalIssue::default(),
        ];
        assert_eq!(pages_affected(&issues), 2);
    }

    #[test]
    fn test_most_common_types() {
        let issues = vec![
            create_test_issue("a", Severity::High, "https://a.test/1"),
            create_test_issue("b", Severity::Low, "https://a.test/1"),
            create_test_issue("b", Severity::Low, "https://a.test/2"),
            create_test_issue("c", Severity::Low, "https://a.test/2"),
        ];
        let groups = group_by_type(&issues);
        let top = most_common_types(groups.as_slice(), 2);
        assert_eq!(top, vec![("b", 2), ("a", 1)]);
    }
}
