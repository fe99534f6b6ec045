//! GitHub Actions context, read once at process start.
//!
//! Components never read the environment ambiently (keeps them independently
//! testable); everything provider-specific flows through this struct.

use std::env;

use anyhow::{Context, Result, anyhow};

use crate::core::scope::branch_name;

/// Immutable CI provider context for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubContext {
    /// Provider-assigned run id. Unique per workflow run but unchanged on
    /// job re-run.
    pub run_id: u64,
    pub repo_owner: String,
    pub repo_name: String,
    /// Fully qualified ref that triggered the run (`refs/heads/...`).
    pub ref_name: String,
    /// Head ref for pull-request triggered runs.
    pub head_ref: Option<String>,
}

impl GithubContext {
    /// Build from the standard GitHub Actions environment.
    pub fn from_env() -> Result<Self> {
        let run_id = require_var("GITHUB_RUN_ID")?
            .parse::<u64>()
            .context("parse GITHUB_RUN_ID")?;
        let repository = require_var("GITHUB_REPOSITORY")?;
        let (repo_owner, repo_name) = repository
            .split_once('/')
            .ok_or_else(|| anyhow!("GITHUB_REPOSITORY is not owner/repo: {repository}"))?;
        let ref_name = require_var("GITHUB_REF")?;
        let head_ref = env::var("GITHUB_HEAD_REF").ok().filter(|v| !v.is_empty());
        Ok(Self {
            run_id,
            repo_owner: repo_owner.to_string(),
            repo_name: repo_name.to_string(),
            ref_name,
            head_ref,
        })
    }

    /// Branch this run publishes under.
    pub fn branch(&self) -> String {
        branch_name(&self.ref_name, self.head_ref.as_deref())
    }
}

fn require_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("missing env var {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_uses_head_ref_for_pull_requests() {
        let ctx = GithubContext {
            run_id: 42,
            repo_owner: "octo".to_string(),
            repo_name: "widgets".to_string(),
            ref_name: "refs/pull/7/merge".to_string(),
            head_ref: Some("feature-x".to_string()),
        };
        assert_eq!(ctx.branch(), "feature-x");
    }

    #[test]
    fn branch_strips_heads_prefix_for_push() {
        let ctx = GithubContext {
            run_id: 42,
            repo_owner: "octo".to_string(),
            repo_name: "widgets".to_string(),
            ref_name: "refs/heads/main".to_string(),
            head_ref: None,
        };
        assert_eq!(ctx.branch(), "main");
    }
}
