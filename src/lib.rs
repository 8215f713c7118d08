//! SeoScope - technical SEO crawl health analysis.
//!
//! Takes the technical issues a crawler found for one crawl and derives
//! issue groups, per-severity counts, a 0-100 health score and remediation
//! guidance per issue type.
//!
//! ```
//! use seoscope::analysis::{analyze, AnalysisOptions};
//! use seoscope::models::{Severity, TechnicalIssue};
//!
//! let issues = vec![TechnicalIssue::new(
//!     "1",
//!     "https://example.com/",
//!     "missing_title",
//!     Severity::High,
//!     "Missing title: page has no <title> element",
//! )];
//!
//! let analysis = analyze(&issues, &AnalysisOptions::default());
//! assert_eq!(analysis.health_score, 95);
//! assert_eq!(analysis.groups[0].title, "Missing Title");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod recommendations;
pub mod report;
pub mod source;

pub use error::{Result, SeoScopeError};
