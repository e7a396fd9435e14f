use std::path::Path;

use anyhow::{Context, Result};
use git2::{Index, Oid, Repository, Signature};
use tracing::{debug, info};

use crate::git::remote::push_branch;

pub const COMMIT_MESSAGE: &str = "Auto Commit: Update new commit id";

/// Records a marker update somewhere outside the marker file itself.
pub trait MarkerTracker {
    fn record(&self, marker: &Path) -> Result<()>;
}

/// Leaves the marker update unrecorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTracking;

impl MarkerTracker for NoTracking {
    fn record(&self, marker: &Path) -> Result<()> {
        debug!("tracking disabled, {} not committed", marker.display());
        Ok(())
    }
}

/// Commits the marker into the repository that contains it and pushes the
/// commit.
#[derive(Debug, Clone)]
pub struct GitTracker {
    remote: String,
    branch: String,
}

impl GitTracker {
    pub fn new(remote: &str, branch: &str) -> Self {
        Self {
            remote: remote.to_string(),
            branch: branch.to_string(),
        }
    }

    pub fn commit_marker(&self, marker: &Path) -> Result<(Repository, Oid)> {
        let marker = marker
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", marker.display()))?;
        let dir = marker
            .parent()
            .context("Head file has no parent directory")?;

        let repo = Repository::discover(dir)
            .with_context(|| format!("No git repository holds {}", marker.display()))?;
        let workdir = repo
            .workdir()
            .context("Tracking repository is bare")?
            .canonicalize()?;
        let relative = marker
            .strip_prefix(&workdir)
            .with_context(|| format!("{} is outside {}", marker.display(), workdir.display()))?
            .to_path_buf();

        let oid = {
            let mut index = repo.index()?;
            index.add_path(&relative)?;
            index.write()?;
            let entry = index
                .get_path(&relative, 0)
                .with_context(|| format!("{} missing from index", relative.display()))?;

            let parent = match repo.head() {
                Ok(head) => Some(head.peel_to_commit()?),
                Err(_) => None,
            };

            // only the marker changes against HEAD, whatever else is staged
            let mut commit_index = Index::new()?;
            if let Some(parent) = &parent {
                commit_index.read_tree(&parent.tree()?)?;
            }
            commit_index.add(&entry)?;
            let tree = repo.find_tree(commit_index.write_tree_to(&repo)?)?;

            let signature = repo
                .signature()
                .or_else(|_| Signature::now("buildcheck", "buildcheck@localhost"))?;
            let parents: Vec<_> = parent.iter().collect();

            repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                COMMIT_MESSAGE,
                &tree,
                &parents,
            )
            .with_context(|| format!("Unable to git commit: {}", relative.display()))?
        };

        debug!("committed {} as {oid}", relative.display());
        Ok((repo, oid))
    }
}

impl MarkerTracker for GitTracker {
    fn record(&self, marker: &Path) -> Result<()> {
        let (repo, oid) = self.commit_marker(marker)?;
        push_branch(&repo, &self.remote, &self.branch)?;
        info!("Recorded head file update {oid} on {}/{}", self.remote, self.branch);
        Ok(())
    }
}
