//! Pass/fail verdict derived from an Allure summary.

use serde::{Deserialize, Serialize};

use crate::io::trend::Statistic;

/// Overall result of a test run.
///
/// Serialized uppercase (`"PASS"`, `"FAIL"`, `"UNKNOWN"`) to match the trend
/// ledger records the report listing page consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResult {
    Pass,
    Fail,
    Unknown,
}

impl TestResult {
    /// Derive the verdict from summary statistics.
    ///
    /// Broken tests count as failures. An empty result set is `Unknown`:
    /// claiming a pass for zero executed tests would misrepresent the run.
    pub fn from_statistic(statistic: &Statistic) -> Self {
        if statistic.broken + statistic.failed > 0 {
            TestResult::Fail
        } else if statistic.passed > 0 {
            TestResult::Pass
        } else {
            TestResult::Unknown
        }
    }

    /// Glyph shown next to the verdict in job summaries.
    pub fn icon(self) -> &'static str {
        match self {
            TestResult::Pass => "✅",
            TestResult::Fail => "❌",
            TestResult::Unknown => "❔",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TestResult::Pass => "PASS",
            TestResult::Fail => "FAIL",
            TestResult::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
