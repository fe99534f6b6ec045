//! Report generation as a black-box external command.
//!
//! The [`ReportGenerator`] trait decouples the publish sequence from the
//! Allure commandline so tests can use a scripted generator that writes a
//! canned summary without spawning processes.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use tracing::{info, instrument};

/// Default install location inside the action container image.
pub const DEFAULT_ALLURE_BIN: &str = "/allure-commandline/bin/allure";

/// Abstraction over the report-generation backend.
///
/// The contract: read `results_dir`, populate `report_dir` with the rendered
/// report including `widgets/summary.json` and a `history` folder. Any
/// failure is fatal to the publish sequence.
pub trait ReportGenerator {
    fn generate(&self, results_dir: &Path, report_dir: &Path) -> Result<()>;
}

/// Generator that spawns the Allure commandline.
#[derive(Debug, Clone)]
pub struct AllureCommandline {
    program: PathBuf,
}

impl AllureCommandline {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for AllureCommandline {
    fn default() -> Self {
        Self::new(DEFAULT_ALLURE_BIN)
    }
}

impl ReportGenerator for AllureCommandline {
    #[instrument(skip_all, fields(report_dir = %report_dir.display()))]
    fn generate(&self, results_dir: &Path, report_dir: &Path) -> Result<()> {
        info!(program = %self.program.display(), "generating allure report");
        // Stdio is inherited so the tool's own progress ends up in the job log.
        let status = Command::new(&self.program)
            .arg("generate")
            .arg("--clean")
            .arg(results_dir)
            .arg("-o")
            .arg(report_dir)
            .status()
            .with_context(|| format!("spawn {}", self.program.display()))?;
        if !status.success() {
            return Err(anyhow!(
                "allure generate failed with status {:?}",
                status.code()
            ));
        }
        Ok(())
    }
}
