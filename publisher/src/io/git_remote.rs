//! Branch existence lookups against the remote repository.
//!
//! Deletion eligibility during branch cleanup hinges on a confirmed "does
//! not exist" answer, so the lookup distinguishes three outcomes: exists,
//! confirmed absent, and could-not-determine (an error the caller must treat
//! as "leave the directory alone").

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

/// Answers "does this branch still exist upstream?".
pub trait BranchLookup {
    /// `Ok(false)` is a confirmed absence; `Err` means the answer could not
    /// be determined (network, auth) and must never trigger deletion.
    fn branch_exists(&self, branch: &str) -> Result<bool>;
}

/// Lookup backed by `git ls-remote` run inside the pages checkout, which
/// already has `origin` configured and authenticated.
#[derive(Debug, Clone)]
pub struct GitRemote {
    workdir: PathBuf,
}

impl GitRemote {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

impl BranchLookup for GitRemote {
    fn branch_exists(&self, branch: &str) -> Result<bool> {
        let refspec = format!("refs/heads/{branch}");
        let output = self.run(&["ls-remote", "--heads", "origin", &refspec])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "git ls-remote failed for {branch}: {}",
                stderr.trim()
            ));
        }
        // ls-remote exits 0 with empty output when no ref matches.
        let exists = !String::from_utf8_lossy(&output.stdout).trim().is_empty();
        debug!(branch, exists, "remote branch lookup");
        Ok(exists)
    }
}

