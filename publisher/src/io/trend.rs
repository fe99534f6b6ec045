//! Trend ledger (`data.json`) per report scope.
//!
//! The ledger is an append-only, newest-first sequence of per-run summary
//! records. Each publish prepends exactly one record; existing records are
//! deserialized and written back untouched. There is no locking: concurrent
//! jobs for the same scope race read-modify-write and the last writer wins.
//! The atomic rename only protects readers from torn files, it does not
//! prevent a concurrent run's record from being dropped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::verdict::TestResult;
use crate::io::probe::exists;

const LEDGER_FILE: &str = "data.json";

/// Relative path of the machine-readable summary inside a generated report.
pub const SUMMARY_PATH: &str = "widgets/summary.json";

/// Statistic counts from Allure's `widgets/summary.json`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistic {
    pub failed: u64,
    pub broken: u64,
    pub skipped: u64,
    pub passed: u64,
    pub unknown: u64,
    pub total: u64,
}

/// Time window of the run, as reported by the summary.
///
/// Allure omits these for an empty result set, so every field is optional;
/// absent fields stay absent when the record is written back.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_duration: Option<i64>,
}

/// The subset of `widgets/summary.json` the publisher consumes.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SummaryJson {
    pub statistic: Statistic,
    #[serde(default)]
    pub time: TimeBounds,
}

/// One entry in the trend ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    pub run_id: u64,
    pub run_unique_id: String,
    pub test_result: TestResult,
    /// Start time of the test execution, from the report summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub summary: TrendSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendSummary {
    pub statistic: Statistic,
    pub time: TimeBounds,
}

/// Run outcome exposed as action outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResults {
    pub test_result: TestResult,
    pub passed: u64,
    /// Broken plus failed: both represent a non-passing execution.
    pub failed: u64,
    pub total: u64,
}

pub fn ledger_path(scope_dir: &Path) -> PathBuf {
    scope_dir.join(LEDGER_FILE)
}

/// Load the scope's ledger, empty for a fresh scope.
pub fn load_ledger(scope_dir: &Path) -> Result<Vec<TrendRecord>> {
    let path = ledger_path(scope_dir);
    if !exists(&path)? {
        debug!(scope = %scope_dir.display(), "no ledger yet, starting empty");
        return Ok(Vec::new());
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read ledger {}", path.display()))?;
    let records: Vec<TrendRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("parse ledger {}", path.display()))?;
    Ok(records)
}

/// Read the freshly generated report's summary statistics.
///
/// Report generation is a prerequisite, so a missing summary is fatal: a run
/// with no recorded outcome would corrupt trend history silently.
pub fn read_summary(report_dir: &Path) -> Result<SummaryJson> {
    let path = report_dir.join(SUMMARY_PATH);
    if !exists(&path)? {
        return Err(anyhow!("missing report summary {}", path.display()));
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read summary {}", path.display()))?;
    let summary: SummaryJson = serde_json::from_str(&contents)
        .with_context(|| format!("parse summary {}", path.display()))?;
    Ok(summary)
}

/// Prepend this run's record to the scope ledger and write it back.
///
/// Returns the verdict and counts for action outputs.
#[instrument(skip_all, fields(run_unique_id))]
pub fn update_trend(
    scope_dir: &Path,
    report_dir: &Path,
    run_id: u64,
    run_unique_id: &str,
) -> Result<RunResults> {
    let summary = read_summary(report_dir)?;
    let mut records = load_ledger(scope_dir)?;

    let test_result = TestResult::from_statistic(&summary.statistic);
    let record = TrendRecord {
        run_id,
        run_unique_id: run_unique_id.to_string(),
        test_result,
        timestamp: summary.time.start,
        summary: TrendSummary {
            statistic: summary.statistic,
            time: summary.time,
        },
    };
    records.insert(0, record);

    let path = ledger_path(scope_dir);
    debug!(path = %path.display(), records = records.len(), verdict = %test_result, "writing ledger");
    let mut buf = serde_json::to_string_pretty(&records)?;
    buf.push('\n');
    write_atomic(&path, &buf)?;

    Ok(RunResults {
        test_result,
        passed: summary.statistic.passed,
        failed: summary.statistic.broken + summary.statistic.failed,
        total: summary.statistic.total,
    })
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("ledger path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp ledger {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace ledger {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{statistic, write_summary};

    #[test]
    fn first_update_creates_single_record_ledger() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scope = temp.path();
        let report = scope.join("42_1000");
        write_summary(&report, &statistic(5, 0, 0), Some(111)).expect("summary");

        let results = update_trend(scope, &report, 42, "42_1000").expect("update");
        assert_eq!(results.test_result, TestResult::Pass);
        assert_eq!(results.passed, 5);
        assert_eq!(results.failed, 0);
        assert_eq!(results.total, 5);

        let records = load_ledger(scope).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].run_unique_id, "42_1000");
        assert_eq!(records[0].timestamp, Some(111));
    }

    #[test]
    fn records_are_prepended_newest_first() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scope = temp.path();
        for (run_id, ts) in [(42u64, 1000i64), (43, 2000), (44, 3000)] {
            let unique = format!("{run_id}_{ts}");
            let report = scope.join(&unique);
            write_summary(&report, &statistic(run_id, 0, 0), Some(ts)).expect("summary");
            update_trend(scope, &report, run_id, &unique).expect("update");
        }

        let records = load_ledger(scope).expect("load");
        let ids: Vec<&str> = records.iter().map(|r| r.run_unique_id.as_str()).collect();
        assert_eq!(ids, vec!["44_3000", "43_2000", "42_1000"]);
        // The head record matches the latest run's summary.
        assert_eq!(records[0].summary.statistic.passed, 44);
    }

    #[test]
    fn combined_failed_count_includes_broken() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scope = temp.path();
        let report = scope.join("42_1000");
        write_summary(&report, &statistic(5, 1, 2), Some(111)).expect("summary");

        let results = update_trend(scope, &report, 42, "42_1000").expect("update");
        assert_eq!(results.test_result, TestResult::Fail);
        assert_eq!(results.failed, 3);
    }

    #[test]
    fn missing_summary_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scope = temp.path();
        let report = scope.join("42_1000");
        fs::create_dir_all(&report).expect("mkdir");

        let err = update_trend(scope, &report, 42, "42_1000").unwrap_err();
        assert!(err.to_string().contains("missing report summary"));
        assert!(!ledger_path(scope).exists());
    }

    #[test]
    fn malformed_ledger_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scope = temp.path();
        fs::create_dir_all(scope).expect("mkdir");
        fs::write(ledger_path(scope), "not json").expect("write");

        let err = load_ledger(scope).unwrap_err();
        assert!(err.to_string().contains("parse ledger"));
    }

    #[test]
    fn ledger_json_uses_camel_case_keys() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scope = temp.path();
        let report = scope.join("42_1000");
        write_summary(&report, &statistic(1, 0, 0), Some(5)).expect("summary");
        update_trend(scope, &report, 42, "42_1000").expect("update");

        let raw = fs::read_to_string(ledger_path(scope)).expect("read");
        assert!(raw.contains("\"runUniqueId\": \"42_1000\""));
        assert!(raw.contains("\"testResult\": \"PASS\""));
    }
}
