//! Crawl issue sources.
//!
//! An [`IssueSource`] hands out a crawl's technical issues page by page,
//! the way a crawl store or API would. Two sources ship with the crate:
//! JSON exports on disk and an in-memory list.

mod json;
mod memory;

pub use json::{parse_issues, JsonFileSource};
pub use memory::MemorySource;

use crate::error::Result;
use crate::models::TechnicalIssue;

/// One page of issues from a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuePage {
    pub issues: Vec<TechnicalIssue>,
    /// Whether another page follows this one.
    pub has_more: bool,
}

/// Supplier of a crawl's technical issues.
#[allow(async_fn_in_trait)]
pub trait IssueSource {
    /// Number of pages the source will hand out.
    fn page_count(&self) -> usize;

    /// Fetch one zero-indexed page.
    async fn fetch_page(&self, page: usize) -> Result<IssuePage>;

    /// Fetch every page in order and concatenate the issues.
    async fn fetch_all(&self) -> Result<Vec<TechnicalIssue>> {
        let mut issues = Vec::new();
        let mut page = 0;

        loop {
            let next = self.fetch_page(page).await?;
            issues.extend(next.issues);
            if !next.has_more {
                break;
            }
            page += 1;
        }

        Ok(issues)
    }
}
