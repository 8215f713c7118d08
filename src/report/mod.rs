//! Report generation.
//!
//! Renders a [`CrawlReport`](crate::models::CrawlReport) as Markdown or JSON.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report, MarkdownOptions};
