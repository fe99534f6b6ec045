//! Orchestration of the publish sequence.
//!
//! Ordering is the crash-consistency contract: the report is generated and
//! the ledger updated before the last-run pointer advances, so the pointer
//! never references a run whose artifacts are incomplete. A crash in the
//! middle leaves at worst a stale pointer, which only costs the next run its
//! carried-forward history.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument};

use crate::core::retention::RetentionPolicy;
use crate::core::scope::{BASE_DIR, ReportUrls, ScopePaths, run_unique_id};
use crate::core::verdict::TestResult;
use crate::io::cleanup::{cleanup_outdated_branches, cleanup_outdated_reports};
use crate::io::executor_meta::{ExecutorInfo, write_executor_json};
use crate::io::generator::ReportGenerator;
use crate::io::git_remote::BranchLookup;
use crate::io::github::GithubContext;
use crate::io::history::carry_forward_history;
use crate::io::last_run::{read_last_run_id, write_last_run};
use crate::io::listing::{should_write_root_listing, write_folder_listing, write_scope_listing};
use crate::io::probe::exists;
use crate::io::results::results_dir_ok;
use crate::io::trend::update_trend;

/// Inputs for one publish invocation.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Source of raw test-result files.
    pub results_dir: PathBuf,
    /// Checkout of the hosting branch the report tree lives under.
    pub pages_dir: PathBuf,
    /// Sub-scope discriminator within a branch (e.g. per test suite).
    pub report_id: String,
    /// Generate directory-listing pages while publishing.
    pub list_dirs: bool,
    pub retention: RetentionPolicy,
    /// Epoch millis captured at process start; part of the run-unique id.
    pub run_timestamp: i64,
}

/// Primary outputs of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub report_url: String,
    pub report_history_url: String,
    pub test_result: TestResult,
    pub passed: u64,
    pub failed: u64,
    pub total: u64,
}

/// Run the primary publish sequence.
///
/// Either every output is produced or the run fails with a single terminal
/// error; there is no partial-success contract. Retention is separate
/// ([`run_retention`]) and only ever runs after this has succeeded.
#[instrument(skip_all, fields(report_id = %opts.report_id))]
pub fn run_publish(
    opts: &PublishOptions,
    ctx: &GithubContext,
    generator: &dyn ReportGenerator,
) -> Result<PublishOutcome> {
    // Precondition failures abort before any mutation of the pages tree.
    if !exists(&opts.pages_dir)? {
        bail!(
            "folder with the pages branch doesn't exist: {}",
            opts.pages_dir.display()
        );
    }
    if !results_dir_ok(&opts.results_dir)? {
        bail!(
            "no usable test result files in {}",
            opts.results_dir.display()
        );
    }

    let branch = ctx.branch();
    let unique_id = run_unique_id(ctx.run_id, opts.run_timestamp);
    let paths = ScopePaths::new(&opts.pages_dir, &branch, &opts.report_id, &unique_id);
    let urls = ReportUrls::new(
        &ctx.repo_owner,
        &ctx.repo_name,
        ctx.run_id,
        &branch,
        &opts.report_id,
        &unique_id,
    );
    info!(
        branch = %branch,
        run_unique_id = %unique_id,
        report_dir = %paths.report_dir.display(),
        report_url = %urls.report_url,
        "publishing report"
    );

    std::fs::create_dir_all(&paths.scope_dir)
        .with_context(|| format!("create scope directory {}", paths.scope_dir.display()))?;

    if opts.list_dirs {
        if should_write_root_listing(&opts.pages_dir)? {
            write_folder_listing(&opts.pages_dir, ".")?;
        }
        write_folder_listing(&opts.pages_dir, BASE_DIR)?;
        write_folder_listing(&opts.pages_dir, &format!("{BASE_DIR}/{branch}"))?;
    }

    // Chain the previous run's trend history into the new report's input.
    match read_last_run_id(&paths.scope_dir)? {
        Some(last_run_id) => {
            carry_forward_history(&paths.scope_dir, &last_run_id, &opts.results_dir)?;
        }
        None => debug!("first run for scope, nothing to carry forward"),
    }

    write_executor_json(
        &opts.results_dir,
        &ExecutorInfo::github(ctx.run_id, &unique_id, &urls.build_url, &urls.report_url),
    )?;

    generator
        .generate(&opts.results_dir, &paths.report_dir)
        .context("report generation")?;

    let results = update_trend(&paths.scope_dir, &paths.report_dir, ctx.run_id, &unique_id)?;
    write_scope_listing(&paths.scope_dir)?;

    // Pointer last: report and ledger are durable at this point.
    write_last_run(&paths.scope_dir, ctx.run_id, opts.run_timestamp)?;

    info!(verdict = %results.test_result, passed = results.passed, failed = results.failed, "report published");
    Ok(PublishOutcome {
        report_url: urls.report_url,
        report_history_url: urls.history_url,
        test_result: results.test_result,
        passed: results.passed,
        failed: results.failed,
        total: results.total,
    })
}

/// Best-effort retention sweeps over the whole published tree.
///
/// Never fails: every per-entry problem is logged and skipped.
#[instrument(skip_all)]
pub fn run_retention(opts: &PublishOptions, lookup: &dyn BranchLookup) {
    if !opts.retention.enabled {
        debug!("retention disabled, skipping sweeps");
        return;
    }
    let base_dir = opts.pages_dir.join(BASE_DIR);
    cleanup_outdated_branches(&base_dir, lookup);
    match opts.retention.max_reports {
        Some(max_reports) => cleanup_outdated_reports(&base_dir, max_reports),
        None => debug!("no usable max_reports cap, skipping report sweep"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::last_run::pointer_path;
    use crate::io::trend::ledger_path;
    use crate::test_support::{FailingGenerator, FakeGenerator, github_context, statistic};

    fn options(root: &std::path::Path) -> PublishOptions {
        let pages_dir = root.join("pages");
        let results_dir = root.join("results");
        std::fs::create_dir_all(&pages_dir).expect("mkdir pages");
        std::fs::create_dir_all(&results_dir).expect("mkdir results");
        std::fs::write(results_dir.join("result.json"), "{}").expect("seed result");
        PublishOptions {
            results_dir,
            pages_dir,
            report_id: "e2e".to_string(),
            list_dirs: false,
            retention: RetentionPolicy::disabled(),
            run_timestamp: 1000,
        }
    }

    #[test]
    fn missing_pages_checkout_fails_before_mutation() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut opts = options(temp.path());
        opts.pages_dir = temp.path().join("nope");
        let generator = FakeGenerator::new(statistic(1, 0, 0));

        let err = run_publish(&opts, &github_context(), &generator).unwrap_err();
        assert!(err.to_string().contains("pages branch doesn't exist"));
    }

    #[test]
    fn empty_results_dir_fails_before_mutation() {
        let temp = tempfile::tempdir().expect("tempdir");
        let opts = options(temp.path());
        std::fs::remove_file(opts.results_dir.join("result.json")).expect("remove");
        let generator = FakeGenerator::new(statistic(1, 0, 0));

        let err = run_publish(&opts, &github_context(), &generator).unwrap_err();
        assert!(err.to_string().contains("no usable test result files"));
        assert!(!opts.pages_dir.join(BASE_DIR).exists());
    }

    #[test]
    fn failed_generation_leaves_no_pointer_or_ledger() {
        let temp = tempfile::tempdir().expect("tempdir");
        let opts = options(temp.path());
        let ctx = github_context();

        let err = run_publish(&opts, &ctx, &FailingGenerator).unwrap_err();
        assert!(err.to_string().contains("report generation"));

        let scope_dir = opts.pages_dir.join(BASE_DIR).join("main").join("e2e");
        assert!(!pointer_path(&scope_dir).exists());
        assert!(!ledger_path(&scope_dir).exists());
    }
}
