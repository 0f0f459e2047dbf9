//! Attendance Matrix - meeting participation reports for GitHub repos
//!
//! A CLI tool that fetches repositories, reads the `# Present` section of
//! every meeting-minutes file and renders who attended which meeting.
//!
//! Exit codes:
//!   0 - Success (documents without attendance are only logged)
//!   1 - Runtime error (config, clone failure, unreadable file, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod repo;
mod report;
mod scanner;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{AttendanceReport, ReportMetadata};
use repo::{CloneResult, RepoId};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

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

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("Attendance Matrix v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args, config).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .attendance.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  .attendance.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .attendance.toml")?;

    println!("✅ Created .attendance.toml with default settings.");
    println!("   Edit it to list your repositories and customize the report.");
    Ok(())
}

/// Initialize logging. Diagnostics go to stderr; `RUST_LOG` overrides the
/// level picked from the verbosity flags.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration and fold the command line over it.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Ignoring unreadable .attendance.toml: {:#}", e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);

    if let Some(ref repos_file) = args.repos_file {
        config.extend_repositories_from_json(repos_file)?;
    }

    Ok(config)
}

/// Generate a report for every configured repository, one at a time.
async fn run(args: Args, config: Config) -> Result<()> {
    let repositories = resolve_repositories(&args, &config)?;
    if repositories.is_empty() {
        anyhow::bail!(
            "No repositories to report on. Use --repo, --repos-file or the [source] section of {}",
            config::CONFIG_FILE_NAME
        );
    }
    info!("Reporting on {} repositories", repositories.len());

    let stylesheet = report::load_stylesheet(config.report.stylesheet.as_deref())?;
    let output_dir = PathBuf::from(&config.general.output_dir);

    if !args.dry_run && config.general.clean_output {
        clean_output_dir(&output_dir)?;
    }

    for repo in &repositories {
        println!("\n📥 Fetching {}", repo);
        let checkout = get_repository(&args, &config, repo).await?;
        if let Some(ref commit) = checkout.commit {
            debug!("{} at commit {}", repo, commit);
        }

        let outcome = index_repository(checkout.repo_path(), &config.source.meetings_dir)
            .with_context(|| format!("Failed to index meetings of {}", repo))?;

        if checkout.is_temporary() {
            debug!("Removing temporary checkout: {}", checkout.repo_path().display());
        }
        drop(checkout);

        let report = AttendanceReport {
            metadata: ReportMetadata {
                repository: repo.slug(),
                generated_at: Utc::now(),
                documents_read: outcome.documents_read,
                documents_skipped: outcome.documents_skipped,
            },
            index: outcome.index,
        };

        print_summary(&report);

        if args.dry_run {
            continue;
        }

        let content = match args.format {
            OutputFormat::Html => {
                let context = report::PageContext {
                    title: &config.report.title,
                    stylesheet: &stylesheet,
                    profile_url: &config.report.profile_url,
                    repositories: &repositories,
                    current: repo,
                };
                report::generate_html_report(&report, &context)
            }
            OutputFormat::Json => report::generate_json_report(&report)?,
        };

        let path = report::page_path(&output_dir, repo, args.format);
        report::write_page(&path, &content)?;
        println!("✅ Report saved to: {}", path.display());
    }

    if args.dry_run {
        println!("\n✅ Dry run complete. No files were written.");
    }

    Ok(())
}

/// Repositories for this run, sorted and deduplicated.
fn resolve_repositories(args: &Args, config: &Config) -> Result<Vec<RepoId>> {
    if let Some(ref local) = args.local {
        let repo = match args.repo.first() {
            Some(id) => RepoId::parse(id)?,
            None => {
                let name = local
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
                    .unwrap_or_else(|| "checkout".to_string());
                RepoId::local(&name)
            }
        };
        return Ok(vec![repo]);
    }

    let mut repositories = config
        .source
        .repositories
        .iter()
        .map(|id| RepoId::parse(id))
        .collect::<Result<Vec<_>>>()?;

    repositories.sort();
    repositories.dedup_by(|a, b| a.slug() == b.slug());

    Ok(repositories)
}

/// Get a checkout of the repository (clone unless --local is set).
async fn get_repository(args: &Args, config: &Config, id: &RepoId) -> Result<CloneResult> {
    if let Some(ref local) = args.local {
        info!("Using local directory: {}", local.display());
        return Ok(CloneResult::local(local));
    }

    let options = repo::CloneOptions {
        branch: config.source.branch.clone(),
        depth: config.clone_depth(),
        show_progress: !args.quiet,
    };

    let url = id.url.clone();
    tokio::task::spawn_blocking(move || repo::clone_repository(&url, options))
        .await
        .context("Clone task failed")?
}

/// Scan the meetings directory and fold every document into an index.
fn index_repository(repo_root: &Path, meetings_dir: &str) -> Result<analysis::IndexOutcome> {
    let scanner = scanner::MeetingScanner::new(repo_root, meetings_dir);
    debug!("Scanning {}", scanner.meetings_root().display());

    analysis::index_documents(scanner.documents()?)
}

/// Remove the previous output so stale pages do not linger.
fn clean_output_dir(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        return Ok(());
    }

    let target = output_dir.canonicalize()?;
    let cwd = std::env::current_dir()?;
    if cwd.starts_with(&target) {
        warn!(
            "Not cleaning {}: it contains the working directory",
            output_dir.display()
        );
        return Ok(());
    }

    info!("Removing previous output: {}", output_dir.display());
    std::fs::remove_dir_all(output_dir)
        .with_context(|| format!("Failed to remove {}", output_dir.display()))
}

/// Print a short attendance summary for one repository.
fn print_summary(report: &AttendanceReport) {
    let index = &report.index;

    println!("📊 {}:", report.metadata.repository);
    println!(
        "   Meeting files: {} ({} without attendance)",
        report.metadata.documents_read, report.metadata.documents_skipped
    );
    println!(
        "   Participants: {} | Meetings: {}",
        index.member_count(),
        index.meeting_count()
    );

    if index.is_empty() {
        println!("   No attendance recorded.");
        return;
    }

    for (member, count) in analysis::most_frequent_attendees(index, 3) {
        println!(
            "   - @{}: {} meetings ({:.0}%)",
            member,
            count,
            analysis::attendance_rate(index, member) * 100.0
        );
    }
}
