//! History carry-forward for trend charts.
//!
//! Allure reads a `history` folder from its input directory and embeds it
//! into the new report's own `history`, forming a chain across runs. Each
//! publish copies the previous run's `history` into the results directory
//! before generation; skipping this on anything but a genuinely missing
//! previous run would flatten trend graphs to a single point.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::io::probe::{PathKind, probe};

const HISTORY_DIR: &str = "history";

/// Copy the previous run's `history` folder into `results_dir`.
///
/// Returns whether a copy happened. A previous run directory that has
/// already been pruned by retention is skipped with a warning, not treated
/// as fatal.
#[instrument(skip_all, fields(last_run_id))]
pub fn carry_forward_history(scope_dir: &Path, last_run_id: &str, results_dir: &Path) -> Result<bool> {
    let src = scope_dir.join(last_run_id).join(HISTORY_DIR);
    match probe(&src)? {
        Some(PathKind::Dir) => {}
        Some(PathKind::File) | None => {
            warn!(src = %src.display(), "previous run has no history folder, skipping carry-forward");
            return Ok(false);
        }
    }
    let dst = results_dir.join(HISTORY_DIR);
    debug!(src = %src.display(), dst = %dst.display(), "carrying history forward");
    copy_dir_recursive(&src, &dst)?;
    Ok(true)
}

/// Recursively copy `src` into `dst`, creating destination directories.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("create directory {}", dst.display()))?;
    let entries =
        fs::read_dir(src).with_context(|| format!("read directory {}", src.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", src.display()))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", from.display()))?;
        if file_type.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to)
                .with_context(|| format!("copy {} to {}", from.display(), to.display()))?;
        }
    }
    Ok(())
}
