//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SeoScope - technical SEO crawl health reports
///
/// Groups a crawl's technical issues by type, scores overall site health
/// and prints remediation advice per issue type. Markdown/JSON reports.
///
/// Examples:
///   seoscope --input crawl-issues.json
///   seoscope --input ./crawl-pages/ --format json --output report.json
///   cat issues.json | seoscope --input - --output -
///   seoscope --input crawl.json --fail-below 80
///   seoscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Crawl issue export to analyze
    ///
    /// A JSON file, a JSON Lines file, a directory of page files, or `-` for stdin.
    #[arg(short, long, value_name = "PATH", required_unless_present = "init_config")]
    pub input: Option<String>,

    /// Output file path for the report (`-` for stdout)
    ///
    /// Defaults to the config file's `general.output`.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .seoscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Crawl identifier shown in the report
    #[arg(long, value_name = "ID", env = "SEOSCOPE_CRAWL_ID")]
    pub crawl_id: Option<String>,

    /// Site URL shown in the report
    #[arg(long, value_name = "URL")]
    pub site_url: Option<String>,

    /// Affected URLs listed per recommendation group
    #[arg(long, value_name = "COUNT")]
    pub max_urls: Option<usize>,

    /// Recommendation groups shown per severity
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// How a group's severity is chosen when its issues disagree
    #[arg(long, value_name = "POLICY")]
    pub group_severity: Option<GroupSeverityArg>,

    /// Fail if the health score is below this value
    ///
    /// Useful for CI pipelines. Exit code 2 when the score is lower.
    #[arg(long, value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub fail_below: Option<u8>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .seoscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Group severity policy for --group-severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupSeverityArg {
    /// Severity of the first issue of each type
    FirstSeen,
    /// Highest severity among the issues of each type
    Highest,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.input.as_deref() {
            None | Some("") => return Err("An --input path is required".to_string()),
            Some("-") => {}
            Some(path) => {
                if !std::path::Path::new(path).exists() {
                    return Err(format!("Input path does not exist: {}", path));
                }
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref site) = self.site_url {
            if !site.starts_with("http://") && !site.starts_with("https://") {
                return Err("Site URL must start with 'http://' or 'https://'".to_string());
            }
        }

        Ok(())
    }

    /// Whether the report goes to stdout instead of a file.
    pub fn writes_to_stdout(&self) -> bool {
        self.output
            .as_deref()
            .map(|p| p.as_os_str() == "-")
            .unwrap_or(false)
    }
}
