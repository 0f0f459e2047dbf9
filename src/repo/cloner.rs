//! Git repository cloning functionality.
//!
//! This module clones repositories into temporary directories using the
//! git2 library. A checkout lives as long as its [`CloneResult`].

use anyhow::{Context, Result};
use git2::{FetchOptions, Progress, RemoteCallbacks, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info};

/// A local checkout ready to be scanned.
pub struct CloneResult {
    /// Path to the repository root.
    pub path: PathBuf,
    /// Short HEAD commit hash, when known.
    pub commit: Option<String>,
    /// Temporary directory handle. The checkout is deleted when this drops.
    /// `None` for directories the tool does not own.
    pub temp_dir: Option<TempDir>,
}

impl CloneResult {
    /// Wrap an existing local directory.
    pub fn local(path: &Path) -> Self {
        let commit = Repository::open(path)
            .ok()
            .and_then(|repo| get_current_commit(&repo));

        Self {
            path: path.to_path_buf(),
            commit,
            temp_dir: None,
        }
    }

    /// Get the path to the repository root.
    pub fn repo_path(&self) -> &Path {
        &self.path
    }

    /// Whether the checkout is removed on drop.
    pub fn is_temporary(&self) -> bool {
        self.temp_dir.is_some()
    }
}

/// Options for cloning a repository.
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Branch to checkout (None for default branch).
    pub branch: Option<String>,
    /// Depth for shallow clone (None for full clone).
    pub depth: Option<i32>,
    /// Whether to show progress.
    pub show_progress: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            branch: None,
            depth: Some(1), // Only the current minutes are needed
            show_progress: true,
        }
    }
}

/// Clone a repository from a URL into a fresh temporary directory.
pub fn clone_repository(url: &str, options: CloneOptions) -> Result<CloneResult> {
    info!("Cloning repository: {}", url);

    let temp = TempDir::new().context("Failed to create temporary directory")?;
    let path = temp.path().to_path_buf();

    debug!("Clone target: {}", path.display());

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("#>-");
        pb.set_style(style);
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let mut callbacks = RemoteCallbacks::new();

    callbacks.transfer_progress(move |progress: Progress<'_>| {
        if let Some(ref pb) = pb_clone {
            pb.set_length(progress.total_objects() as u64);
            pb.set_position(progress.received_objects() as u64);
        }
        true
    });

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);

    if let Some(depth) = options.depth {
        fetch_opts.depth(depth);
    }

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_opts);

    if let Some(ref branch) = options.branch {
        builder.branch(branch);
    }

    let repo = builder
        .clone(url, &path)
        .with_context(|| format!("Failed to clone repository: {}", url))?;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let commit = get_current_commit(&repo);
    info!(
        "Cloned {} at {} into {}",
        url,
        commit.as_deref().unwrap_or("unknown commit"),
        path.display()
    );

    Ok(CloneResult {
        path,
        commit,
        temp_dir: Some(temp),
    })
}

/// Get the current commit hash (short form).
pub fn get_current_commit(repo: &Repository) -> Option<String> {
    repo.head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok())
        .map(|commit| commit.id().to_string()[..8].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_options_default() {
        let opts = CloneOptions::default();
        assert!(opts.branch.is_none());
        assert_eq!(opts.depth, Some(1));
        assert!(opts.show_progress);
    }

    #[test]
    fn test_local_checkout_is_not_owned() {
        let temp = TempDir::new().unwrap();
        let checkout = CloneResult::local(temp.path());

        assert_eq!(checkout.repo_path(), temp.path());
        assert!(!checkout.is_temporary());
        assert!(checkout.commit.is_none());
    }

    #[test]
    fn test_local_checkout_reads_head_commit() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let signature = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let oid = repo
            .commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
            .unwrap();

        let checkout = CloneResult::local(temp.path());
        assert_eq!(checkout.commit, Some(oid.to_string()[..8].to_string()));
    }

    #[test]
    fn test_clone_invalid_url_fails() {
        let options = CloneOptions {
            show_progress: false,
            ..CloneOptions::default()
        };
        assert!(clone_repository("/definitely/not/a/repository", options).is_err());
    }
}
