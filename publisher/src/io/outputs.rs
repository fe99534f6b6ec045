//! Action outputs, written only after the publish sequence succeeds.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::publish::PublishOutcome;

/// Render the outputs as `key=value` lines.
fn render(outcome: &PublishOutcome) -> String {
    let mut buf = String::new();
    buf.push_str(&format!("report_url={}\n", outcome.report_url));
    buf.push_str(&format!(
        "report_history_url={}\n",
        outcome.report_history_url
    ));
    buf.push_str(&format!("test_result={}\n", outcome.test_result));
    buf.push_str(&format!(
        "test_result_icon={}\n",
        outcome.test_result.icon()
    ));
    buf.push_str(&format!("test_result_passed={}\n", outcome.passed));
    buf.push_str(&format!("test_result_failed={}\n", outcome.failed));
    buf.push_str(&format!("test_result_total={}\n", outcome.total));
    buf
}

/// Write outputs to the `GITHUB_OUTPUT` file when the runner provides one,
/// else to stdout for local invocations.
pub fn write_outputs(outcome: &PublishOutcome, github_output: Option<&Path>) -> Result<()> {
    let rendered = render(outcome);
    match github_output {
        Some(path) => {
            debug!(path = %path.display(), "appending action outputs");
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open outputs file {}", path.display()))?;
            file.write_all(rendered.as_bytes())
                .with_context(|| format!("write outputs file {}", path.display()))?;
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
