//! Executor descriptor (`executor.json`) consumed by Allure.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

/// Build metadata Allure embeds in the report and uses to link trend points
/// back to CI runs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorInfo {
    /// Provider identifier. Must be non-empty: Allure dereferences it
    /// unconditionally and dies with a NullPointerException otherwise.
    pub r#type: String,
    pub name: String,
    pub build_name: String,
    pub build_url: String,
    /// Required for the trend widget to open previous reports.
    pub report_url: String,
    pub build_order: u64,
}

impl ExecutorInfo {
    pub fn github(run_id: u64, run_unique_id: &str, build_url: &str, report_url: &str) -> Self {
        Self {
            r#type: "github".to_string(),
            name: "GitHub Actions".to_string(),
            build_name: format!("Run {run_unique_id}"),
            build_url: build_url.to_string(),
            report_url: report_url.to_string(),
            build_order: run_id,
        }
    }
}

/// Write `executor.json` into the results directory before generation.
pub fn write_executor_json(results_dir: &Path, info: &ExecutorInfo) -> Result<()> {
    let path = results_dir.join("executor.json");
    debug!(path = %path.display(), build_name = %info.build_name, "writing executor descriptor");
    let mut buf = serde_json::to_string_pretty(info)?;
    buf.push('\n');
    fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
