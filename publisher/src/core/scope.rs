//! Report scope naming: branch names, directory layout, public URLs.
//!
//! A scope is the `(branch, report id)` pair isolating one history line. On
//! disk it maps to `<pages>/allure-action/<branch>/<report id>/`, which owns
//! the last-run pointer, the trend ledger, the listing page, and one
//! directory per published run.

use std::path::{Path, PathBuf};

/// Root directory for all published reports inside the pages checkout.
pub const BASE_DIR: &str = "allure-action";

/// Resolve the branch name a run publishes under.
///
/// Pull-request builds run on a synthetic merge ref, so the head ref is used
/// when present. Otherwise the `refs/heads/` prefix is stripped from the ref.
pub fn branch_name(ref_name: &str, head_ref: Option<&str>) -> String {
    if let Some(head) = head_ref.filter(|h| !h.is_empty()) {
        return head.to_string();
    }
    ref_name
        .strip_prefix("refs/heads/")
        .unwrap_or(ref_name)
        .to_string()
}

/// Durable unique key for one run: provider run id plus the timestamp
/// captured at process start. The provider id alone repeats on job re-run.
pub fn run_unique_id(run_id: u64, run_timestamp: i64) -> String {
    format!("{run_id}_{run_timestamp}")
}

/// Resolved directory layout for one publish invocation.
#[derive(Debug, Clone)]
pub struct ScopePaths {
    /// `<pages>/allure-action`
    pub base_dir: PathBuf,
    /// `<pages>/allure-action/<branch>`
    pub branch_dir: PathBuf,
    /// `<pages>/allure-action/<branch>/<report id>`
    pub scope_dir: PathBuf,
    /// `<pages>/allure-action/<branch>/<report id>/<run unique id>`
    pub report_dir: PathBuf,
}

impl ScopePaths {
    pub fn new(pages_dir: &Path, branch: &str, report_id: &str, run_unique_id: &str) -> Self {
        let base_dir = pages_dir.join(BASE_DIR);
        let branch_dir = base_dir.join(branch);
        let scope_dir = branch_dir.join(report_id);
        let report_dir = scope_dir.join(run_unique_id);
        Self {
            base_dir,
            branch_dir,
            scope_dir,
            report_dir,
        }
    }
}

/// Public URLs derived for one publish invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportUrls {
    /// Link back to the provider run that produced the report.
    pub build_url: String,
    /// History line for the scope (listing page).
    pub history_url: String,
    /// This run's report.
    pub report_url: String,
}

impl ReportUrls {
    pub fn new(
        owner: &str,
        repo: &str,
        run_id: u64,
        branch: &str,
        report_id: &str,
        run_unique_id: &str,
    ) -> Self {
        let build_url = format!("https://github.com/{owner}/{repo}/actions/runs/{run_id}");
        let pages_url = format!("https://{owner}.github.io/{repo}");
        // Branch and report ids may contain spaces; pages serves them percent-encoded.
        let history_url =
            format!("{pages_url}/{BASE_DIR}/{branch}/{report_id}").replace(' ', "%20");
        let report_url = format!("{history_url}/{run_unique_id}");
        Self {
            build_url,
            history_url,
            report_url,
        }
    }
}
