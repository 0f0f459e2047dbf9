//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.attendance.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".attendance.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Repository source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory the generated pages are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Remove the output directory before generating.
    #[serde(default = "default_true")]
    pub clean_output: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            verbose: false,
            clean_output: true,
        }
    }
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_true() -> bool {
    true
}

/// Where meeting minutes come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Repositories to report on (`owner/name` or URLs).
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Directory inside each repository holding the minutes.
    #[serde(default = "default_meetings_dir")]
    pub meetings_dir: String,

    /// Branch to fetch (default branch when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Clone depth; 0 fetches the full history.
    #[serde(default = "default_depth")]
    pub depth: i32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repositories: Vec::new(),
            meetings_dir: default_meetings_dir(),
            branch: None,
            depth: default_depth(),
        }
    }
}

fn default_meetings_dir() -> String {
    crate::scanner::DEFAULT_MEETINGS_DIR.to_string()
}

fn default_depth() -> i32 {
    1
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Stylesheet inlined into every page (built-in styles when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,

    /// Prefix of participant profile links.
    #[serde(default = "default_profile_url")]
    pub profile_url: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            stylesheet: None,
            profile_url: default_profile_url(),
        }
    }
}

fn default_title() -> String {
    "Meeting Participation".to_string()
}

fn default_profile_url() -> String {
    "https://www.github.com/".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, and only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output_dir) = args.output_dir {
            self.general.output_dir = output_dir.display().to_string();
        }
        if args.keep_output {
            self.general.clean_output = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if !args.repo.is_empty() {
            self.source.repositories = args.repo.clone();
        }
        if let Some(ref meetings_dir) = args.meetings_dir {
            self.source.meetings_dir = meetings_dir.clone();
        }
        if let Some(ref branch) = args.branch {
            self.source.branch = Some(branch.clone());
        }

        if let Some(ref title) = args.title {
            self.report.title = title.clone();
        }
    }

    /// Append repositories read from a JSON list, such as `repositories.json`.
    pub fn extend_repositories_from_json(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read repository list: {}", path.display()))?;

        let repos: Vec<String> = serde_json::from_str(&content)
            .with_context(|| format!("Repository list must be a JSON array: {}", path.display()))?;

        self.source.repositories.extend(repos);
        Ok(())
    }

    /// Clone depth as git2 expects it.
    pub fn clone_depth(&self) -> Option<i32> {
        (self.source.depth > 0).then_some(self.source.depth)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        config.source.repositories = vec!["nodejs/TSC".to_string()];
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
