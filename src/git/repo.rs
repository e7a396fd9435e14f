use std::path::{Path, PathBuf};

use chrono::{FixedOffset, TimeZone};
use git2::{Oid, Repository};
use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_REMOTE: &str = "origin";

#[derive(Debug, Error)]
pub enum RepoAccessError {
    #[error("Unable to open git repository at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Remote `{remote}` not found in {path}")]
    NoRemote { path: PathBuf, remote: String },

    #[error("HEAD of {0} is not on a branch")]
    DetachedHead(PathBuf),

    #[error("Unable to resolve HEAD of {path}: {source}")]
    Head {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
}

/// Position of the tracked repository at the time it was inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoSnapshot {
    pub remote_url: String,
    pub branch: String,
    pub head_commit: String,
}

pub trait RepoInspector {
    fn inspect(&self, path: &Path) -> Result<RepoSnapshot, RepoAccessError>;

    /// Description of the head commit. Never fails: falls back to the bare
    /// commit id.
    fn top_commit_description(&self, path: &Path, snapshot: &RepoSnapshot) -> String;
}

/// [`RepoInspector`] backed by the working copy's git metadata.
#[derive(Debug, Clone)]
pub struct GitInspector {
    remote: String,
}

impl Default for GitInspector {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE)
    }
}

impl GitInspector {
    pub fn new(remote: &str) -> Self {
        Self {
            remote: remote.to_string(),
        }
    }
}

impl RepoInspector for GitInspector {
    fn inspect(&self, path: &Path) -> Result<RepoSnapshot, RepoAccessError> {
        let repo = Repository::open(path).map_err(|source| RepoAccessError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let remote_url = repo
            .find_remote(&self.remote)
            .ok()
            .and_then(|r| r.url().map(String::from))
            .ok_or_else(|| RepoAccessError::NoRemote {
                path: path.to_path_buf(),
                remote: self.remote.clone(),
            })?;

        let head_err = |source: git2::Error| RepoAccessError::Head {
            path: path.to_path_buf(),
            source,
        };
        let head = repo.head().map_err(head_err)?;
        if !head.is_branch() {
            return Err(RepoAccessError::DetachedHead(path.to_path_buf()));
        }
        let branch = head
            .shorthand()
            .ok_or_else(|| head_err(git2::Error::from_str("Failed to read branch name")))?
            .to_string();
        let head_commit = head.peel_to_commit().map_err(head_err)?.id().to_string();

        info!("Repo Information:");
        info!("   Repo URL:  {remote_url}");
        info!("   Branch:    {branch}");
        info!("   HEAD SHA:  {head_commit}");

        Ok(RepoSnapshot {
            remote_url,
            branch,
            head_commit,
        })
    }

    fn top_commit_description(&self, path: &Path, snapshot: &RepoSnapshot) -> String {
        match describe_commit(path, &snapshot.head_commit) {
            Ok(log) => log,
            Err(e) => {
                error!("Unable to get the top commit log ({e}). Use commit id");
                snapshot.head_commit.clone()
            }
        }
    }
}

/// Renders a commit the way `git log -1 --no-decorate` prints it.
pub fn describe_commit(path: &Path, commit_id: &str) -> Result<String, git2::Error> {
    let repo = Repository::open(path)?;
    let commit = repo.find_commit(Oid::from_str(commit_id.trim())?)?;

    let author = commit.author();
    let time = commit.time();
    let date = FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|tz| tz.timestamp_opt(time.seconds(), 0).single())
        .ok_or_else(|| git2::Error::from_str("Invalid commit date"))?;

    let mut log = format!(
        "commit {}\nAuthor: {} <{}>\nDate:   {}\n\n",
        commit.id(),
        author.name().unwrap_or_default(),
        author.email().unwrap_or_default(),
        date.format("%a %b %-d %H:%M:%S %Y %z"),
    );
    for line in commit.message().unwrap_or_default().lines() {
        if !line.is_empty() {
            log.push_str("    ");
            log.push_str(line);
        }
        log.push('\n');
    }

    Ok(log)
}
