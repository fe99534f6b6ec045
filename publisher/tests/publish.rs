//! Lifecycle tests for the full publish sequence.
//!
//! These drive `run_publish` across multiple runs of the same scope to
//! verify end-to-end behavior: trend accumulation, history chaining through
//! the generator, pointer advancement, and retention sweeps.

use std::fs;
use std::path::{Path, PathBuf};

use publisher::core::retention::RetentionPolicy;
use publisher::core::verdict::TestResult;
use publisher::io::last_run::read_last_run_id;
use publisher::io::trend::load_ledger;
use publisher::publish::{PublishOptions, run_publish, run_retention};
use publisher::test_support::{FakeBranchLookup, FakeGenerator, github_context, statistic};

fn options(root: &Path, run_timestamp: i64) -> PublishOptions {
    let pages_dir = root.join("pages");
    // Fresh results per run, like a real CI job.
    let results_dir = root.join(format!("results-{run_timestamp}"));
    fs::create_dir_all(&pages_dir).expect("mkdir pages");
    fs::create_dir_all(&results_dir).expect("mkdir results");
    fs::write(results_dir.join("result.json"), "{}").expect("seed result");
    PublishOptions {
        results_dir,
        pages_dir,
        report_id: "e2e".to_string(),
        list_dirs: true,
        retention: RetentionPolicy::disabled(),
        run_timestamp,
    }
}

fn scope_dir(opts: &PublishOptions) -> PathBuf {
    opts.pages_dir.join("allure-action").join("main").join("e2e")
}

/// Three runs against a fresh scope: pass, fail, empty.
///
/// Verifies after each run k that the ledger has exactly k records,
/// newest-first, with the head matching that run's summary; that the pointer
/// always names the latest run; and that trend history chains through the
/// generator across all runs.
#[test]
fn lifecycle_accumulates_trend_across_runs() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ctx = github_context();

    // Run 1: all passed.
    let opts1 = options(temp.path(), 1000);
    let outcome1 = run_publish(&opts1, &ctx, &FakeGenerator::new(statistic(5, 0, 0)))
        .expect("publish run 1");
    assert_eq!(outcome1.test_result, TestResult::Pass);
    assert_eq!(outcome1.passed, 5);
    assert_eq!(
        outcome1.report_url,
        "https://octo.github.io/widgets/allure-action/main/e2e/42_1000"
    );
    let scope = scope_dir(&opts1);
    assert_eq!(load_ledger(&scope).expect("ledger").len(), 1);
    assert_eq!(
        read_last_run_id(&scope).expect("pointer").as_deref(),
        Some("42_1000")
    );
    // First run: nothing carried forward.
    assert!(!opts1.results_dir.join("history").exists());

    // Run 2: one failure.
    let opts2 = options(temp.path(), 2000);
    let outcome2 = run_publish(&opts2, &ctx, &FakeGenerator::new(statistic(5, 1, 0)))
        .expect("publish run 2");
    assert_eq!(outcome2.test_result, TestResult::Fail);
    assert_eq!(outcome2.failed, 1);
    // Run 1's history was carried into run 2's results before generation.
    assert!(opts2.results_dir.join("history").join("run-5.json").is_file());

    // Run 3: empty result set.
    let opts3 = options(temp.path(), 3000);
    let outcome3 = run_publish(&opts3, &ctx, &FakeGenerator::new(statistic(0, 0, 0)))
        .expect("publish run 3");
    assert_eq!(outcome3.test_result, TestResult::Unknown);
    assert_eq!(outcome3.total, 0);

    let records = load_ledger(&scope).expect("ledger");
    let ids: Vec<&str> = records.iter().map(|r| r.run_unique_id.as_str()).collect();
    assert_eq!(ids, vec!["42_3000", "42_2000", "42_1000"]);
    assert_eq!(records[0].test_result, TestResult::Unknown);
    assert_eq!(records[1].summary.statistic.failed, 1);
    assert_eq!(records[2].summary.statistic.passed, 5);
    assert_eq!(
        read_last_run_id(&scope).expect("pointer").as_deref(),
        Some("42_3000")
    );

    // History chained across all three reports.
    let final_history = scope.join("42_3000").join("history");
    assert!(final_history.join("run-5.json").is_file());
    assert!(final_history.join("run-6.json").is_file());
    assert!(final_history.join("run-0.json").is_file());

    // Structural artifacts per run and per scope.
    assert!(opts3.results_dir.join("executor.json").is_file());
    assert!(scope.join("index.html").is_file());
    assert!(opts3.pages_dir.join("index.html").is_file());
    assert!(opts3.pages_dir.join("allure-action/index.html").is_file());
    assert!(opts3.pages_dir.join("allure-action/main/index.html").is_file());
    assert!(scope.join("42_3000/widgets/summary.json").is_file());
}

/// Retention caps the scope at `max_reports` newest runs and removes branch
/// directories only on a confirmed-absent branch.
#[test]
fn retention_prunes_old_runs_and_dead_branches() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ctx = github_context();

    for ts in [1000, 2000, 3000, 4000, 5000] {
        let opts = options(temp.path(), ts);
        run_publish(&opts, &ctx, &FakeGenerator::new(statistic(3, 0, 0))).expect("publish");
    }

    // A second branch whose upstream is gone, and one that can't be checked.
    let base = temp.path().join("pages").join("allure-action");
    fs::create_dir_all(base.join("deleted-branch/e2e/7_100")).expect("mkdir");
    fs::create_dir_all(base.join("flaky-branch/e2e/8_100")).expect("mkdir");

    let mut opts = options(temp.path(), 6000);
    opts.retention = RetentionPolicy::from_inputs(true, "2");
    let lookup = FakeBranchLookup::new(&["main"]).with_errors(&["flaky-branch"]);
    run_retention(&opts, &lookup);

    let scope = scope_dir(&opts);
    let mut runs: Vec<String> = fs::read_dir(&scope)
        .expect("read scope")
        .map(|e| e.expect("entry"))
        .filter(|e| e.file_type().expect("type").is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    runs.sort();
    assert_eq!(runs, vec!["42_4000", "42_5000"]);
    // Ledger entries are not pruned with the run directories.
    assert_eq!(load_ledger(&scope).expect("ledger").len(), 5);
    // Bookkeeping survives the sweep.
    assert!(scope.join("data.json").is_file());
    assert!(scope.join("lastRun.json").is_file());

    assert!(!base.join("deleted-branch").exists());
    assert!(base.join("flaky-branch").is_dir());
    assert!(base.join("main").is_dir());
}

/// A disabled policy and an unusable cap both leave the tree alone.
#[test]
fn retention_disabled_or_unparsable_cap_is_a_noop() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ctx = github_context();
    for ts in [1000, 2000, 3000] {
        let opts = options(temp.path(), ts);
        run_publish(&opts, &ctx, &FakeGenerator::new(statistic(1, 0, 0))).expect("publish");
    }
    let lookup = FakeBranchLookup::new(&[]);

    let mut opts = options(temp.path(), 4000);
    opts.retention = RetentionPolicy::disabled();
    run_retention(&opts, &lookup);
    // Disabled: even the absent branch survives.
    assert!(scope_dir(&opts).join("42_1000").is_dir());

    opts.retention = RetentionPolicy::from_inputs(true, "not-a-number");
    let lookup = FakeBranchLookup::new(&["main"]);
    run_retention(&opts, &lookup);
    let runs = fs::read_dir(scope_dir(&opts))
        .expect("read scope")
        .map(|e| e.expect("entry"))
        .filter(|e| e.file_type().expect("type").is_dir())
        .count();
    assert_eq!(runs, 3);
}
