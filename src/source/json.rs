//! JSON crawl exports on disk.
//!
//! A single file is one page. A directory is a paged export: every
//! `.json` / `.jsonl` file under it is one page, in path order.

use super::{IssuePage, IssueSource};
use crate::error::{Result, SeoScopeError};
use crate::models::TechnicalIssue;
use futures::future::try_join_all;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const PAGE_EXTENSIONS: [&str; 2] = ["json", "jsonl"];

/// Keys that mark a bare top-level object as an issue record.
const ISSUE_FIELDS: [&str; 8] = [
    "id",
    "pageUrl",
    "page_url",
    "issueType",
    "issue_type",
    "severity",
    "issue_severity",
    "description",
];

/// Issue pages stored as JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pages: Vec<PathBuf>,
}

impl JsonFileSource {
    /// A source backed by an explicit list of page files.
    pub fn from_files(pages: Vec<PathBuf>) -> Self {
        Self { pages }
    }

    /// Open a file or directory as a source.
    pub fn discover(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Ok(Self::from_files(vec![path.to_path_buf()]));
        }

        let mut pages: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && has_page_extension(e.path()))
            .map(|e| e.into_path())
            .collect();

        if pages.is_empty() {
            return Err(SeoScopeError::invalid_input(
                path.display().to_string(),
                "directory contains no .json or .jsonl files",
            ));
        }

        pages.sort();
        debug!("Found {} page files under {}", pages.len(), path.display());

        Ok(Self::from_files(pages))
    }

    async fn read_page(path: &Path) -> Result<Vec<TechnicalIssue>> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SeoScopeError::io(path, e))?;

        parse_issues(&path.display().to_string(), &content)
    }
}

impl IssueSource for JsonFileSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn fetch_page(&self, page: usize) -> Result<IssuePage> {
        let path = self
            .pages
            .get(page)
            .ok_or(SeoScopeError::PageOutOfRange(page))?;

        Ok(IssuePage {
            issues: Self::read_page(path).await?,
            has_more: page + 1 < self.pages.len(),
        })
    }

    /// Reads all page files concurrently; issues keep page order.
    async fn fetch_all(&self) -> Result<Vec<TechnicalIssue>> {
        let pages = try_join_all(self.pages.iter().map(|p| Self::read_page(p))).await?;
        Ok(pages.into_iter().flatten().collect())
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|n| n.starts_with('.')).unwrap_or(false)
}

fn has_page_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| PAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Parse one page of crawl output.
///
/// Accepts a JSON array of issues, an object with an `issues` array, a
/// single issue object, or JSON Lines. Entries that are not objects are
/// skipped with a warning; missing fields inside an object fall back to
/// defaults. A document that is cut off is an error, never a partial list.
pub fn parse_issues(origin: &str, content: &str) -> Result<Vec<TechnicalIssue>> {
    if content.trim().is_empty() {
        debug!("{} is empty", origin);
        return Ok(Vec::new());
    }

    let entries = match serde_json::from_str::<Value>(content) {
        Ok(document) => document_entries(origin, document)?,
        Err(document_err) if looks_like_json_lines(origin, content) => {
            json_lines_entries(origin, content).ok_or_else(|| {
                SeoScopeError::invalid_input(origin, format!("not valid JSON: {}", document_err))
            })?
        }
        Err(document_err) => {
            return Err(SeoScopeError::invalid_input(
                origin,
                format!("not valid JSON: {}", document_err),
            ))
        }
    };

    let total = entries.len();
    let issues: Vec<TechnicalIssue> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| issue_from_value(origin, i, entry))
        .collect();

    if issues.len() < total {
        warn!(
            "{}: skipped {} of {} records that were not issue objects",
            origin,
            total - issues.len(),
            total
        );
    }

    Ok(issues)
}

fn document_entries(origin: &str, document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => match map.remove("issues") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(Value::Null) => Ok(Vec::new()),
            Some(_) => Err(SeoScopeError::invalid_input(
                origin,
                "`issues` must be an array",
            )),
            None if ISSUE_FIELDS.iter().any(|f| map.contains_key(*f)) => {
                Ok(vec![Value::Object(map)])
            }
            None => {
                warn!("{}: object has no issue fields, ignoring it", origin);
                Ok(Vec::new())
            }
        },
        other => Err(SeoScopeError::invalid_input(
            origin,
            format!("expected an array or object, found {}", json_kind(&other)),
        )),
    }
}

/// JSON Lines is only tried for `.jsonl` files, or when the first line is a
/// complete object on its own. A truncated array or wrapper object fails
/// the whole-document parse and must not be salvaged line by line.
fn looks_like_json_lines(origin: &str, content: &str) -> bool {
    if origin.to_lowercase().ends_with(".jsonl") {
        return true;
    }

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|first| {
            !first.starts_with('[')
                && matches!(serde_json::from_str::<Value>(first), Ok(Value::Object(_)))
        })
        .unwrap_or(false)
}

/// Returns `None` when no line parses, so the caller reports the document error.
fn json_lines_entries(origin: &str, content: &str) -> Option<Vec<Value>> {
    let mut entries = Vec::new();
    let mut bad_lines = 0;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => entries.push(value),
            Err(e) => {
                warn!("{}:{}: skipping malformed line: {}", origin, line_no + 1, e);
                bad_lines += 1;
            }
        }
    }

    if entries.is_empty() {
        return None;
    }
    if bad_lines > 0 {
        debug!("{}: read as JSON Lines with {} bad lines", origin, bad_lines);
    }
    Some(entries)
}

fn issue_from_value(origin: &str, index: usize, entry: Value) -> Option<TechnicalIssue> {
    if !entry.is_object() {
        debug!("{}[{}]: not an object ({})", origin, index, json_kind(&entry));
        return None;
    }

    match serde_json::from_value(entry) {
        Ok(issue) => Some(issue),
        Err(e) => {
            debug!("{}[{}]: {}", origin, index, e);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
