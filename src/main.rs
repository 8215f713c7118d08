//! SeoScope - technical SEO crawl health reports
//!
//! A CLI tool that reads a crawl's technical issues, scores site health
//! and writes a Markdown or JSON report with remediation advice.
//!
//! Exit codes:
//!   0 - Success (score at or above threshold, or no --fail-below set)
//!   1 - Runtime error (unreadable input, bad config, etc.)
//!   2 - Health score below --fail-below threshold

use anyhow::{Context, Result};
use chrono::Utc;
use seoscope::analysis::analyze;
use seoscope::cli::{Args, OutputFormat};
use seoscope::config::{Config, CONFIG_FILE_NAME};
use seoscope::models::{CrawlReport, ReportMetadata, TechnicalIssue};
use seoscope::report::{self, MarkdownOptions};
use seoscope::source::{parse_issues, IssueSource, JsonFileSource, MemorySource};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `general.verbose` applies
    let mut config = match Config::resolve(args.config.as_deref(), Path::new(".")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.general.log_level(args.quiet));

    info!("SeoScope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .seoscope.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize score weights and report layout.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so `--output -` keeps stdout clean.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Load, analyze and report. Returns exit code (0 or 2).
async fn run(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let input = args.input.as_deref().unwrap_or("-");
    let (issues, source_pages) = load_issues(input).await?;
    info!("Loaded {} issues from {} page(s)", issues.len(), source_pages);

    let analysis = analyze(&issues, &config.analysis_options());

    let report = CrawlReport {
        metadata: ReportMetadata {
            crawl_id: args.crawl_id.clone(),
            site_url: args.site_url.clone(),
            generated_at: Utc::now(),
            source_pages,
        },
        analysis,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            let options = MarkdownOptions {
                top_per_severity: config.report.top_per_severity,
                include_affected_urls: config.report.include_affected_urls,
            };
            report::generate_markdown_report(&report, &options)
        }
    };

    let analysis = &report.analysis;

    if args.writes_to_stdout() {
        println!("{}", output);
    } else {
        let output_path = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.general.output));
        std::fs::write(&output_path, &output)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

        if !args.quiet {
            let counts = &analysis.severity_counts;
            println!("\n📊 Crawl Summary:");
            println!("   Issues: {} across {} pages", analysis.total_issues, analysis.pages_affected);
            println!(
                "   - 🔴 High: {} | 🟡 Medium: {} | 🟢 Low: {}",
                counts.high, counts.medium, counts.low
            );
            println!("   Issue types: {}", analysis.groups.len());
            println!(
                "   Health score: {}/100 ({})",
                analysis.health_score, analysis.grade
            );
            println!("\n✅ Report saved to: {}", output_path.display());
        }
    }

    debug!("Finished in {:.2}s", start_time.elapsed().as_secs_f64());

    // Check --fail-below threshold
    if let Some(threshold) = args.fail_below {
        if analysis.health_score < threshold {
            eprintln!(
                "\n⛔ Health score {} is below {}. Failing (exit code 2).",
                analysis.health_score, threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Read issues from stdin, a file or a directory of page files.
async fn load_issues(input: &str) -> Result<(Vec<TechnicalIssue>, usize)> {
    if input == "-" {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read issues from stdin")?;

        let source = MemorySource::new(parse_issues("stdin", &content)?);
        return Ok((source.fetch_all().await?, source.page_count()));
    }

    let source = JsonFileSource::discover(Path::new(input))?;
    let issues = source
        .fetch_all()
        .await
        .with_context(|| format!("Failed to load issues from {}", input))?;

    Ok((issues, source.page_count()))
}
