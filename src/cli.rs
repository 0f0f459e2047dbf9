//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::repo::RepoId;
use clap::Parser;
use std::path::PathBuf;

/// Attendance Matrix - meeting participation reports for GitHub repos
///
/// Reads the `# Present` section of every meeting-minutes file in a
/// repository's `meetings` directory and renders who attended which
/// meeting as an HTML table.
///
/// Examples:
///   attendance --repo nodejs/TSC
///   attendance --repo nodejs/TSC,nodejs/build --output-dir site
///   attendance --repos-file repositories.json --format json
///   attendance --repo nodejs/TSC --local ./TSC --dry-run
///   attendance --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Repositories to report on (comma-separated or repeated)
    ///
    /// Accepts owner/name shorthand for GitHub, HTTPS URLs and SSH URLs.
    #[arg(short, long, value_name = "REPO", value_delimiter = ',')]
    pub repo: Vec<String>,

    /// JSON file holding an array of repositories
    #[arg(long, value_name = "FILE")]
    pub repos_file: Option<PathBuf>,

    /// Local checkout to read instead of cloning
    ///
    /// Used for the single repository given with --repo, or reported
    /// as local/<dir> when no repository is named.
    #[arg(long, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Directory the generated pages are written to
    #[arg(short, long, value_name = "DIR", env = "ATTENDANCE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .attendance.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (html, json)
    #[arg(long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Specific branch to fetch
    ///
    /// If not specified, uses the default branch
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Directory holding the meeting minutes inside each repository
    #[arg(long, value_name = "DIR")]
    pub meetings_dir: Option<String>,

    /// Page title
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Fetch and index repositories without writing any pages
    #[arg(long)]
    pub dry_run: bool,

    /// Keep existing files in the output directory
    #[arg(long)]
    pub keep_output: bool,

    /// Generate a default .attendance.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// HTML attendance table (default)
    #[default]
    Html,
    /// JSON attendance index
    Json,
}

impl OutputFormat {
    /// File extension of generated pages.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
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

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for repo in &self.repo {
            RepoId::parse(repo).map_err(|e| e.to_string())?;
        }

        if let Some(ref local_path) = self.local {
            if !local_path.exists() {
                return Err(format!(
                    "Local directory does not exist: {}",
                    local_path.display()
                ));
            }
            if !local_path.is_dir() {
                return Err(format!(
                    "Local path is not a directory: {}",
                    local_path.display()
                ));
            }
            if self.repo.len() > 1 || self.repos_file.is_some() {
                return Err("--local reads a single repository".to_string());
            }
        }

        if let Some(ref file) = self.repos_file {
            if !file.is_file() {
                return Err(format!("Repository list not found: {}", file.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            repo: vec!["nodejs/TSC".to_string()],
            repos_file: None,
            local: None,
            output_dir: None,
            config: None,
            format: OutputFormat::Html,
            branch: None,
            meetings_dir: None,
            title: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            keep_output: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_repo_list() {
        let args = Args::try_parse_from([
            "attendance",
            "--repo",
            "nodejs/TSC,nodejs/build",
            "-r",
            "libuv/leps",
        ])
        .unwrap();
        assert_eq!(args.repo, vec!["nodejs/TSC", "nodejs/build", "libuv/leps"]);
        assert_eq!(args.format, OutputFormat::Html);
    }

    #[test]
    fn test_validation_invalid_repo() {
        let mut args = make_args();
        args.repo = vec!["not-a-repo".to_string()];
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_local_with_many_repos() {
        let mut args = make_args();
        args.local = Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        assert!(args.validate().is_ok());

        args.repo.push("nodejs/build".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_local_dir() {
        let mut args = make_args();
        args.local = Some(PathBuf::from("/no/such/checkout"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Html.extension(), "html");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
