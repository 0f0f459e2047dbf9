//! Repository fetching.
//!
//! Resolves repository identifiers and produces local checkouts that the
//! meeting scanner can read from.

pub mod cloner;

pub use cloner::*;

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

/// A repository whose meetings are reported on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepoId {
    /// Owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// URL the repository is cloned from.
    pub url: String,
}

impl RepoId {
    /// Parse an identifier.
    ///
    /// Accepts `owner/name` shorthand (resolved against GitHub), HTTPS URLs
    /// and `git@host:owner/name` SSH URLs, with or without a `.git` suffix.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let (path, url) = if let Some(rest) = input.strip_prefix("https://") {
            let path = rest.split_once('/').map(|(_, p)| p).unwrap_or("");
            (path, input.to_string())
        } else if let Some(rest) = input.strip_prefix("git@") {
            let path = rest.split_once(':').map(|(_, p)| p).unwrap_or("");
            (path, input.to_string())
        } else {
            let url = format!("https://github.com/{}.git", input.trim_end_matches(".git"));
            (input, url)
        };

        let path = path.trim_end_matches('/').trim_end_matches(".git");
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            [owner, name] if is_valid_segment(owner) && is_valid_segment(name) => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
                url,
            }),
            _ => anyhow::bail!(
                "Invalid repository '{}': expected owner/name or a repository URL",
                input
            ),
        }
    }

    /// Identifier for a local directory with no remote.
    pub fn local(name: &str) -> Self {
        Self {
            owner: "local".to_string(),
            name: name.to_string(),
            url: String::new(),
        }
    }

    /// Short `owner/name` form.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shorthand() {
        let repo = RepoId::parse("nodejs/TSC").unwrap();
        assert_eq!(repo.owner, "nodejs");
        assert_eq!(repo.name, "TSC");
        assert_eq!(repo.url, "https://github.com/nodejs/TSC.git");
        assert_eq!(repo.to_string(), "nodejs/TSC");
    }

    #[test]
    fn test_parse_https_url() {
        let repo = RepoId::parse("https://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(repo.slug(), "rust-lang/rust");
        assert_eq!(repo.url, "https://github.com/rust-lang/rust.git");

        let repo = RepoId::parse("https://gitlab.com/group/project/").unwrap();
        assert_eq!(repo.slug(), "group/project");
    }

    #[test]
    fn test_parse_ssh_url() {
        let repo = RepoId::parse("git@github.com:nodejs/build").unwrap();
        assert_eq!(repo.slug(), "nodejs/build");
        assert_eq!(repo.url, "git@github.com:nodejs/build");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(RepoId::parse("just-a-name").is_err());
        assert!(RepoId::parse("a/b/c").is_err());
        assert!(RepoId::parse("../etc").is_err());
        assert!(RepoId::parse("https://github.com/").is_err());
    }

    #[test]
    fn test_repo_ids_sort_by_owner_then_name() {
        let mut repos: Vec<RepoId> = ["nodejs/TSC", "nodejs/CTC", "libuv/leps"]
            .iter()
            .map(|r| r.parse().unwrap())
            .collect();
        repos.sort();

        let slugs: Vec<String> = repos.iter().map(RepoId::slug).collect();
        assert_eq!(slugs, vec!["libuv/leps", "nodejs/CTC", "nodejs/TSC"]);
    }
}
