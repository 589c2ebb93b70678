//! Site-Audit main entry point
//!
//! This is the command-line interface for the Site-Audit website auditor.

use anyhow::Context;
use clap::Parser;
use site_audit::audit::{ScanRequest, Scanner};
use site_audit::config::{load_config_with_hash, Config};
use site_audit::output::export_recent_csv;
use site_audit::storage::open_storage;
use site_audit::summary::Lang;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Site-Audit: a single-page website auditor
///
/// Site-Audit fetches a page, checks its HTML, SEO and GDPR basics, scores
/// them and stores a shareable report. By default it serves the web UI and
/// JSON API.
#[derive(Parser, Debug)]
#[command(name = "site-audit")]
#[command(version = "1.0.0")]
#[command(about = "A single-page website auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without serving
    #[arg(long, conflicts_with_all = ["scan", "export_csv"])]
    dry_run: bool,

    /// Scan a single URL, print the outcome and exit
    #[arg(long, value_name = "URL", conflicts_with_all = ["dry_run", "export_csv"])]
    scan: Option<String>,

    /// Report language for --scan (en or fi)
    #[arg(long, default_value = "en")]
    lang: Lang,

    /// Send the report-ready email to this address after --scan
    #[arg(long, requires = "scan")]
    email: Option<String>,

    /// Write the most recent scans to a CSV file and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "scan"])]
    export_csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if let Some(url) = cli.scan {
        let mut request = ScanRequest::new(url).with_lang(cli.lang);
        if let Some(email) = cli.email {
            request = request.with_email(email);
        }
        handle_scan(&config, request).await?;
    } else if let Some(path) = cli.export_csv {
        handle_export_csv(&config, &path)?;
    } else {
        site_audit::server::serve(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_audit=info,warn"),
            1 => EnvFilter::new("site_audit=debug,info"),
            2 => EnvFilter::new("site_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn present(value: Option<String>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "not set"
    }
}

/// Handles the --dry-run mode: validates config and shows effective settings
fn handle_dry_run(config: &Config) {
    println!("=== Site-Audit Dry Run ===\n");

    println!("Server:");
    println!("  Bind: {}", config.server.bind);
    println!("  Public base URL: {}", config.server.public_base_url);
    println!("  Export limit: {}", config.server.export_limit);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}ms", config.fetcher.timeout_ms);
    println!("  Max redirects: {}", config.fetcher.max_redirects);

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\nScoring:");
    println!("  Strategy: {}", config.scoring.strategy);

    println!("\nSummarizer:");
    println!("  API base: {}", config.summarizer.api_base);
    println!("  Model: {}", config.summarizer.model);
    println!(
        "  API key (${}): {}",
        config.summarizer.api_key_env,
        present(config.summarizer.api_key())
    );

    println!("\nAdmin:");
    println!(
        "  Basic auth: {}",
        if config.admin.credentials().is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );

    println!("\nEmail:");
    println!("  From: {}", config.email.from);
    println!(
        "  API key (${}): {}",
        config.email.api_key_env,
        present(config.email.api_key())
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --scan mode: runs one scan and prints the outcome
async fn handle_scan(config: &Config, request: ScanRequest) -> anyhow::Result<()> {
    let store = open_storage(Path::new(&config.storage.database_path))?;
    let scanner = Scanner::from_config(config, Arc::new(store))?;

    let outcome = scanner.scan(request).await?;

    println!("Report id: {}", outcome.id);
    println!("Score: {}/100", outcome.score);
    println!("Report: {}", scanner.report_url(&outcome.id));
    println!("\n{}", serde_json::to_string_pretty(&outcome.summary)?);

    Ok(())
}

/// Handles the --export-csv mode: writes the most recent scans to a file
fn handle_export_csv(config: &Config, path: &Path) -> anyhow::Result<()> {
    println!("Database: {}", config.storage.database_path);

    let store = open_storage(Path::new(&config.storage.database_path))?;
    let exported = export_recent_csv(&store, config.server.export_limit, path)?;

    println!("✓ Exported {} scans to: {}", exported, path.display());
    Ok(())
}
