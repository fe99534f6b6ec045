//! Test-only helpers: scripted generators, fake branch lookups, summary
//! fixtures.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use serde_json::json;

use crate::io::generator::ReportGenerator;
use crate::io::git_remote::BranchLookup;
use crate::io::github::GithubContext;
use crate::io::history::copy_dir_recursive;
use crate::io::trend::Statistic;

/// Statistic with the remaining counts derived from the arguments.
pub fn statistic(passed: u64, failed: u64, broken: u64) -> Statistic {
    Statistic {
        failed,
        broken,
        skipped: 0,
        passed,
        unknown: 0,
        total: passed + failed + broken,
    }
}

/// Write an Allure-shaped `widgets/summary.json` under `report_dir`.
pub fn write_summary(report_dir: &Path, statistic: &Statistic, start: Option<i64>) -> Result<()> {
    let widgets = report_dir.join("widgets");
    fs::create_dir_all(&widgets)?;
    let time = match start {
        Some(start) => json!({ "start": start, "stop": start + 60_000, "duration": 60_000 }),
        None => json!({}),
    };
    let summary = json!({
        "reportName": "Allure Report",
        "testRuns": [],
        "statistic": statistic,
        "time": time,
    });
    let mut buf = serde_json::to_string_pretty(&summary)?;
    buf.push('\n');
    fs::write(widgets.join("summary.json"), buf)?;
    Ok(())
}

/// Deterministic CI context used across orchestration tests.
pub fn github_context() -> GithubContext {
    GithubContext {
        run_id: 42,
        repo_owner: "octo".to_string(),
        repo_name: "widgets".to_string(),
        ref_name: "refs/heads/main".to_string(),
        head_ref: None,
    }
}

/// Generator that writes a canned summary and mimics Allure's history
/// embedding: the input's `history` folder (if any) is folded into the
/// report's own `history`, alongside a file recording this run.
#[derive(Debug, Clone)]
pub struct FakeGenerator {
    pub statistic: Statistic,
    pub start: Option<i64>,
}

impl FakeGenerator {
    pub fn new(statistic: Statistic) -> Self {
        Self {
            statistic,
            start: Some(1_700_000_000_000),
        }
    }
}

impl ReportGenerator for FakeGenerator {
    fn generate(&self, results_dir: &Path, report_dir: &Path) -> Result<()> {
        fs::create_dir_all(report_dir)?;
        write_summary(report_dir, &self.statistic, self.start)?;

        let history_out = report_dir.join("history");
        let history_in = results_dir.join("history");
        if history_in.is_dir() {
            copy_dir_recursive(&history_in, &history_out)?;
        } else {
            fs::create_dir_all(&history_out)?;
        }
        let mut buf = serde_json::to_string_pretty(&json!({ "statistic": self.statistic }))?;
        buf.push('\n');
        fs::write(
            history_out.join(format!("run-{}.json", self.statistic.total)),
            buf,
        )?;
        Ok(())
    }
}

/// Generator that always fails, for abort-path tests.
pub struct FailingGenerator;

impl ReportGenerator for FailingGenerator {
    fn generate(&self, _results_dir: &Path, _report_dir: &Path) -> Result<()> {
        Err(anyhow!("generator exploded"))
    }
}

/// Branch lookup answering from fixed sets: branches in `existing` exist,
/// branches in `errors` fail the lookup, everything else is confirmed
/// absent.
#[derive(Debug, Clone, Default)]
pub struct FakeBranchLookup {
    existing: BTreeSet<String>,
    errors: BTreeSet<String>,
}

impl FakeBranchLookup {
    pub fn new(existing: &[&str]) -> Self {
        Self {
            existing: existing.iter().map(|s| (*s).to_string()).collect(),
            errors: BTreeSet::new(),
        }
    }

    pub fn with_errors(mut self, errors: &[&str]) -> Self {
        self.errors = errors.iter().map(|s| (*s).to_string()).collect();
        self
    }
}

impl BranchLookup for FakeBranchLookup {
    fn branch_exists(&self, branch: &str) -> Result<bool> {
        if self.errors.contains(branch) {
            return Err(anyhow!("lookup failed for {branch}"));
        }
        Ok(self.existing.contains(branch))
    }
}
