//! In-memory issue source.

use super::{IssuePage, IssueSource};
use crate::error::{Result, SeoScopeError};
use crate::models::TechnicalIssue;

/// Serves a list of issues already held in memory, `page_size` at a time.
#[derive(Debug, Clone)]
pub struct MemorySource {
    issues: Vec<TechnicalIssue>,
    page_size: usize,
}

impl MemorySource {
    /// A source that returns everything in a single page.
    pub fn new(issues: Vec<TechnicalIssue>) -> Self {
        let page_size = issues.len().max(1);
        Self { issues, page_size }
    }

    /// A source that splits the issues into pages of `page_size`.
    pub fn paged(issues: Vec<TechnicalIssue>, page_size: usize) -> Self {
        Self {
            issues,
            page_size: page_size.max(1),
        }
    }
}

impl IssueSource for MemorySource {
    fn page_count(&self) -> usize {
        self.issues.len().div_ceil(self.page_size).max(1)
    }

    async fn fetch_page(&self, page: usize) -> Result<IssuePage> {
        if page >= self.page_count() {
            return Err(SeoScopeError::PageOutOfRange(page));
        }

        let start = page * self.page_size;
        let end = (start + self.page_size).min(self.issues.len());

        Ok(IssuePage {
            issues: self.issues[start..end].to_vec(),
            has_more: page + 1 < self.page_count(),
        })
    }
}
