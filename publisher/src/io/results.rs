//! Validation of the raw results directory before any mutation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::io::probe::{PathKind, probe};

const RESULT_EXTENSIONS: [&str; 2] = [".json", ".xml"];

/// Check that the results directory exists and holds at least one result
/// file (`.json` or `.xml`, case-insensitive, files only).
///
/// Returns `Ok(false)` with a logged reason when the directory is unusable;
/// the orchestrator turns that into a fatal precondition error before
/// touching the pages tree.
pub fn results_dir_ok(results_dir: &Path) -> Result<bool> {
    match probe(results_dir)? {
        Some(PathKind::Dir) => {}
        Some(PathKind::File) | None => {
            warn!(path = %results_dir.display(), "results folder doesn't exist");
            return Ok(false);
        }
    }
    let entries = fs::read_dir(results_dir)
        .with_context(|| format!("read directory {}", results_dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("read entry in {}", results_dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if RESULT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            return Ok(true);
        }
    }
    warn!(path = %results_dir.display(), "results folder has no json or xml files");
    Ok(false)
}
