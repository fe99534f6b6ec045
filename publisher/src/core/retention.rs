//! Retention policy and expired-report selection.

/// Retention configuration parsed from action inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Master gate for both retention sweeps.
    pub enabled: bool,
    /// Cap on retained run directories per scope. `None` disables the report
    /// sweep (the branch sweep is unaffected).
    pub max_reports: Option<u32>,
}

impl RetentionPolicy {
    /// Build a policy from raw inputs.
    ///
    /// `max_reports` arrives as an untyped action input. A value that is not
    /// a positive integer disables the report sweep rather than failing the
    /// run or, worse, being treated as "keep zero reports".
    pub fn from_inputs(enabled: bool, max_reports: &str) -> Self {
        let max_reports = max_reports.trim().parse::<u32>().ok().filter(|n| *n > 0);
        Self {
            enabled,
            max_reports,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_reports: None,
        }
    }
}

/// Select run-directory names to delete, keeping the `max_reports` newest.
///
/// Names have the form `<runId>_<timestamp>`; recency is the embedded
/// run-start timestamp, with the run id as tiebreak. The provider id is
/// assigned independently of run order (a retry reuses an old id), so the
/// timestamp must dominate and comparison must be numeric, not textual.
/// Names that don't parse sort by name, behind every parsable one, so they
/// age out first. Returns the expired names; empty when at or under the cap.
pub fn select_expired(mut names: Vec<String>, max_reports: u32) -> Vec<String> {
    if names.len() <= max_reports as usize {
        return Vec::new();
    }
    // Newest first, then everything past the cap is expired.
    names.sort_unstable_by(|a, b| (run_key(b), b).cmp(&(run_key(a), a)));
    names.split_off(max_reports as usize)
}

/// Numeric `(timestamp, run id)` recency key for a run-directory name.
fn run_key(name: &str) -> Option<(i64, u64)> {
    let (run_id, timestamp) = name.split_once('_')?;
    Some((timestamp.parse().ok()?, run_id.parse().ok()?))
}
