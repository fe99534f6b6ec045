//! Last-run pointer (`lastRun.json`) per report scope.
//!
//! The pointer records the most recently completed run so the next run can
//! locate its `history` folder. It is written wholesale after the report and
//! ledger are durable, never in place: a missing or stale pointer only costs
//! trend continuity, while a pointer to a half-written run would chain
//! corrupt history forward.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::scope::run_unique_id;
use crate::io::probe::exists;

const POINTER_FILE: &str = "lastRun.json";

/// Identity of the most recently completed run for a scope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastRun {
    /// Provider-assigned run id (repeats on job re-run).
    pub run_id: u64,
    /// Epoch millis captured at process start, disambiguating retries.
    pub run_timestamp: i64,
}

pub fn pointer_path(scope_dir: &Path) -> PathBuf {
    scope_dir.join(POINTER_FILE)
}

/// Read the previous run's unique id, or `None` for a fresh scope.
///
/// Malformed pointer content is fatal: repairing or ignoring it would
/// silently break the trend chain.
pub fn read_last_run_id(scope_dir: &Path) -> Result<Option<String>> {
    let path = pointer_path(scope_dir);
    if !exists(&path)? {
        debug!(scope = %scope_dir.display(), "no last-run pointer, first run for scope");
        return Ok(None);
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read pointer {}", path.display()))?;
    let last_run: LastRun = serde_json::from_str(&contents)
        .with_context(|| format!("parse pointer {}", path.display()))?;
    Ok(Some(run_unique_id(last_run.run_id, last_run.run_timestamp)))
}

/// Overwrite the pointer for `scope_dir`.
///
/// Only call after the run's report directory and ledger update are on disk.
pub fn write_last_run(scope_dir: &Path, run_id: u64, run_timestamp: i64) -> Result<()> {
    let path = pointer_path(scope_dir);
    debug!(path = %path.display(), run_id, run_timestamp, "writing last-run pointer");
    let last_run = LastRun {
        run_id,
        run_timestamp,
    };
    let mut buf = serde_json::to_string_pretty(&last_run)?;
    buf.push('\n');
    write_atomic(&path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("pointer path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp pointer {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace pointer {}", path.display()))?;
    Ok(())
}
