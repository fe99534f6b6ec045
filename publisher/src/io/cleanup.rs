//! Retention sweeps over the published report tree.
//!
//! Both sweeps are best-effort housekeeping that runs only after the primary
//! publish has succeeded: every per-entry failure is logged and skipped so a
//! cleanup hiccup can never hold the run's outputs hostage. Both are
//! idempotent and safe to run on every invocation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::core::retention::select_expired;
use crate::io::git_remote::BranchLookup;

/// Delete branch directories whose source-control branch no longer exists.
///
/// Each immediate subdirectory of `base_dir` is named after a branch that
/// once published a report. A branch name containing `/` publishes into
/// nested directories, so only its first segment is visible here and gets
/// queried as a branch. Deletion happens only on a confirmed "does not
/// exist" answer; a lookup failure leaves the directory untouched.
#[instrument(skip_all, fields(base_dir = %base_dir.display()))]
pub fn cleanup_outdated_branches(base_dir: &Path, lookup: &dyn BranchLookup) {
    let Some(branch_dirs) = list_subdirs(base_dir) else {
        return;
    };
    for dir in branch_dirs {
        let Some(branch) = file_name(&dir) else {
            continue;
        };
        match lookup.branch_exists(&branch) {
            Ok(true) => debug!(branch, "branch still exists, keeping reports"),
            Ok(false) => {
                info!(branch, dir = %dir.display(), "branch is gone, removing reports");
                remove_dir_best_effort(&dir);
            }
            Err(err) => {
                warn!(branch, err = %err, "could not confirm branch status, keeping reports");
            }
        }
    }
}

/// Within every report scope under `base_dir`, delete run directories beyond
/// the `max_reports` newest.
///
/// Scope bookkeeping entries (`lastRun.json`, `data.json`, `index.html`) are
/// plain files and never counted as runs.
#[instrument(skip_all, fields(base_dir = %base_dir.display(), max_reports))]
pub fn cleanup_outdated_reports(base_dir: &Path, max_reports: u32) {
    let Some(branch_dirs) = list_subdirs(base_dir) else {
        return;
    };
    for branch_dir in branch_dirs {
        let Some(scope_dirs) = list_subdirs(&branch_dir) else {
            continue;
        };
        for scope_dir in scope_dirs {
            prune_scope(&scope_dir, max_reports);
        }
    }
}

fn prune_scope(scope_dir: &Path, max_reports: u32) {
    let Some(run_dirs) = list_subdirs(scope_dir) else {
        return;
    };
    let names: Vec<String> = run_dirs.iter().filter_map(|dir| file_name(dir)).collect();
    let expired = select_expired(names, max_reports);
    if expired.is_empty() {
        debug!(scope = %scope_dir.display(), "scope at or under retention cap");
        return;
    }
    info!(scope = %scope_dir.display(), count = expired.len(), "pruning expired reports");
    for name in expired {
        remove_dir_best_effort(&scope_dir.join(name));
    }
}

/// List immediate subdirectories, logging and returning `None` on failure.
fn list_subdirs(dir: &Path) -> Option<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), err = %err, "cannot list directory, skipping sweep");
            return None;
        }
    };
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), err = %err, "cannot read entry, skipping it");
                continue;
            }
        };
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => subdirs.push(entry.path()),
            Ok(_) => {}
            Err(err) => {
                warn!(path = %entry.path().display(), err = %err, "cannot stat entry, skipping it");
            }
        }
    }
    Some(subdirs)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn remove_dir_best_effort(dir: &Path) {
    if let Err(err) = fs::remove_dir_all(dir) {
        warn!(dir = %dir.display(), err = %err, "failed to remove directory, continuing");
    }
}
