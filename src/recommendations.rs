//! Remediation guidance for technical SEO issues.
//!
//! A static knowledge table maps normalized issue types to ordered
//! remediation bullets. Unknown types get a generic fallback so a new
//! crawler check never needs a code change to be reported.

use crate::models::{IssueGroup, RecommendationGroup, Severity};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Bullets returned for issue types the table does not know.
pub const GENERIC_RECOMMENDATIONS: &[&str] = &[
    "Fix the identified issues on every affected page to improve search visibility.",
    "Regularly monitor for similar issues in future crawls.",
    "Consider consulting a specialist if the issue persists or its cause is unclear.",
];

const BROKEN_LINKS: &[&str] = &[
    "Update or remove links that point to pages returning 4xx or 5xx responses.",
    "Set up 301 redirects from removed URLs to the closest relevant live page.",
    "Check external links periodically, since third-party pages move without notice.",
    "Fix internal navigation and sitemap entries that reference the broken URLs.",
];

const MISSING_TITLE: &[&str] = &[
    "Add unique, descriptive title tags to every page.",
    "Keep titles between 50 and 60 characters so they are not truncated in results.",
    "Place the page's primary keyword near the start of the title.",
    "Avoid generic titles such as \"Home\" or \"Untitled\".",
];

const MISSING_META_DESCRIPTION: &[&str] = &[
    "Write a unique meta description for each page summarizing its content.",
    "Keep meta descriptions between 120 and 160 characters.",
    "Include the primary keyword and a clear call to action.",
];

const MISSING_H1: &[&str] = &[
    "Add a single H1 heading that describes the main topic of the page.",
    "Make the H1 consistent with, but not identical to, the title tag.",
    "Use H2 to H6 for subsections to keep a logical heading hierarchy.",
];

const DUPLICATE_CONTENT: &[&str] = &[
    "Consolidate duplicate pages and redirect the copies to one canonical URL.",
    "Add rel=\"canonical\" tags pointing to the preferred version of each page.",
    "Rewrite near-duplicate pages so each one targets a distinct intent.",
    "Check URL parameters, session IDs and trailing-slash variants that create copies.",
];

const SLOW_PAGE: &[&str] = &[
    "Compress and resize images, and serve them in modern formats such as WebP or AVIF.",
    "Minify and defer non-critical JavaScript and CSS.",
    "Enable browser caching and serve static assets from a CDN.",
    "Reduce server response time by caching rendered pages or upgrading hosting.",
    "Lazy-load images and embeds below the fold.",
];

const MOBILE_UNFRIENDLY: &[&str] = &[
    "Add a responsive viewport meta tag: <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
    "Use a responsive layout that adapts to small screens without horizontal scrolling.",
    "Make tap targets at least 48 pixels and space them apart.",
    "Use a base font size of at least 16 pixels.",
];

const MIXED_CONTENT: &[&str] = &[
    "Load every image, script and stylesheet over HTTPS.",
    "Replace hard-coded http:// asset URLs with https:// or protocol-relative paths.",
    "Add a Content-Security-Policy with upgrade-insecure-requests.",
];

const REDIRECT_CHAIN: &[&str] = &[
    "Point links and redirects straight at the final destination URL.",
    "Collapse multi-hop redirects into a single 301 redirect.",
    "Update internal links and the sitemap to use final URLs.",
];

const LOW_WORD_COUNT: &[&str] = &[
    "Expand thin pages with original, useful content that answers the visitor's question.",
    "Merge closely related thin pages into one comprehensive page.",
    "Add supporting media, FAQs or examples where they help the reader.",
    "Mark pages that must stay thin, such as utility pages, with noindex.",
];

const DUPLICATE_TITLE: &[&str] = &[
    "Give every page a title that reflects its specific content.",
    "Use templates that include distinguishing details such as product or category names.",
    "Consolidate pages that duplicate each other's purpose.",
];

const DUPLICATE_META_DESCRIPTION: &[&str] = &[
    "Write a distinct meta description for each page.",
    "Generate descriptions from page-specific data when pages share a template.",
    "Leave the description empty rather than repeating one across many pages.",
];

const MISSING_ALT_TEXT: &[&str] = &[
    "Add descriptive alt attributes to informative images.",
    "Use an empty alt attribute (alt=\"\") for purely decorative images.",
    "Keep alt text concise and avoid keyword stuffing.",
];

const MISSING_CANONICAL: &[&str] = &[
    "Add a self-referencing rel=\"canonical\" tag to each indexable page.",
    "Point canonical tags of duplicate or parameterized URLs at the preferred version.",
    "Use absolute URLs in canonical tags.",
];

const NOINDEX_PAGE: &[&str] = &[
    "Confirm the noindex directive is intentional for this page.",
    "Remove noindex from pages that should appear in search results.",
    "Remove noindexed pages from the XML sitemap.",
];

const LARGE_PAGE_SIZE: &[&str] = &[
    "Remove unused CSS and JavaScript from the page.",
    "Compress HTML, CSS and JavaScript with gzip or Brotli.",
    "Split very long pages or paginate large listings.",
];

const MULTIPLE_H1: &[&str] = &[
    "Keep a single H1 per page describing its main topic.",
    "Demote secondary headings to H2 or lower.",
    "Check templates and widgets that inject extra H1 tags.",
];

const TITLE_TOO_LONG: &[&str] = &[
    "Shorten titles to roughly 60 characters.",
    "Move the most important words to the front of the title.",
    "Drop repeated brand names or boilerplate from long titles.",
];

const META_DESCRIPTION_TOO_LONG: &[&str] = &[
    "Shorten meta descriptions to about 160 characters.",
    "Lead with the most compelling information so truncation does not hide it.",
    "Remove filler phrases and repeated keywords.",
];

const SERVER_ERROR: &[&str] = &[
    "Check server logs for the cause of 5xx responses on the affected URLs.",
    "Fix failing application routes or upstream dependencies.",
    "Monitor uptime and alert on error-rate spikes.",
    "Return 503 with a Retry-After header during planned maintenance.",
];

/// Normalized issue type -> remediation bullets. Built once, never mutated.
static KNOWLEDGE_TABLE: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    [
        ("broken_link", BROKEN_LINKS),
        ("broken_links", BROKEN_LINKS),
        ("missing_title", MISSING_TITLE),
        ("missing_meta_description", MISSING_META_DESCRIPTION),
        ("missing_h1", MISSING_H1),
        ("duplicate_content", DUPLICATE_CONTENT),
        ("slow_page", SLOW_PAGE),
        ("mobile_unfriendly", MOBILE_UNFRIENDLY),
        ("mixed_content", MIXED_CONTENT),
        ("redirect_chain", REDIRECT_CHAIN),
        ("low_word_count", LOW_WORD_COUNT),
        ("duplicate_title", DUPLICATE_TITLE),
        ("duplicate_meta_description", DUPLICATE_META_DESCRIPTION),
        ("missing_alt_text", MISSING_ALT_TEXT),
        ("missing_canonical", MISSING_CANONICAL),
        ("noindex_page", NOINDEX_PAGE),
        ("large_page_size", LARGE_PAGE_SIZE),
        ("multiple_h1", MULTIPLE_H1),
        ("title_too_long", TITLE_TOO_LONG),
        ("meta_description_too_long", META_DESCRIPTION_TOO_LONG),
        ("server_error", SERVER_ERROR),
    ]
    .into_iter()
    .collect()
});

/// Normalize an issue type to the table's key form:
/// trimmed, lowercase, spaces and hyphens replaced by underscores.
pub fn normalize_issue_type(issue_type: &str) -> String {
    issue_type
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// Remediation bullets for an issue type, or the generic fallback.
pub fn recommendations_for_type(issue_type: &str) -> &'static [&'static str] {
    KNOWLEDGE_TABLE
        .get(normalize_issue_type(issue_type).as_str())
        .copied()
        .unwrap_or(GENERIC_RECOMMENDATIONS)
}

/// Whether the knowledge table has specific guidance for an issue type.
pub fn has_specific_recommendations(issue_type: &str) -> bool {
    KNOWLEDGE_TABLE.contains_key(normalize_issue_type(issue_type).as_str())
}

/// Turn each issue group into a recommendation group, keeping group order.
///
/// At most `max_urls` affected URLs are carried; the rest are counted in
/// `additional_urls`.
pub fn build_recommendations(groups: &[IssueGroup], max_urls: usize) -> Vec<RecommendationGroup> {
    groups
        .iter()
        .map(|group| {
            let shown = group.affected_urls.len().min(max_urls);
            RecommendationGroup {
                issue_type: group.issue_type.clone(),
                title: group.title.clone(),
                description: group.description.clone(),
                severity: group.severity,
                issue_count: group.count,
                recommendations: recommendations_for_type(&group.issue_type)
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                affected_urls: group.affected_urls[..shown].to_vec(),
                additional_urls: group.affected_urls.len() - shown,
            }
        })
        .collect()
}

/// Recommendation groups split by severity, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeverityBuckets {
    pub high: Vec<RecommendationGroup>,
    pub medium: Vec<RecommendationGroup>,
    pub low: Vec<RecommendationGroup>,
    /// Groups whose severity was missing or unrecognized.
    pub unrecognized: Vec<RecommendationGroup>,
}

impl SeverityBuckets {
    /// Keep at most `n` groups per bucket.
    pub fn top(mut self, n: usize) -> Self {
        self.high.truncate(n);
        self.medium.truncate(n);
        self.low.truncate(n);
        self.unrecognized.truncate(n);
        self
    }

    /// Buckets from most to least severe, unrecognized last.
    pub fn iter(&self) -> impl Iterator<Item = (Option<Severity>, &[RecommendationGroup])> {
        [
            (Some(Severity::High), self.high.as_slice()),
            (Some(Severity::Medium), self.medium.as_slice()),
            (Some(Severity::Low), self.low.as_slice()),
            (None, self.unrecognized.as_slice()),
        ]
        .into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, groups)| groups.is_empty())
    }
}

/// Partition recommendation groups into severity buckets.
pub fn partition_by_severity(recommendations: &[RecommendationGroup]) -> SeverityBuckets {
    let mut buckets = SeverityBuckets::default();

    for rec in recommendations {
        let bucket = match rec.severity {
            Some(Severity::High) => &mut buckets.high,
            Some(Severity::Medium) => &mut buckets.medium,
            Some(Severity::Low) => &mut buckets.low,
            None => &mut buckets.unrecognized,
        };
        bucket.push(rec.clone());
    }

    buckets
}
