//! Publish an Allure report into a GitHub Pages checkout with rolling
//! per-branch history and retention.

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;

use publisher::core::retention::RetentionPolicy;
use publisher::io::generator::{AllureCommandline, DEFAULT_ALLURE_BIN};
use publisher::io::git_remote::GitRemote;
use publisher::io::github::GithubContext;
use publisher::io::outputs::write_outputs;
use publisher::logging;
use publisher::publish::{PublishOptions, run_publish, run_retention};

/// Boolean action inputs arrive as the strings `"true"`/`"false"`, matching
/// the GitHub Actions input contract, so they are compared rather than
/// parsed.
#[derive(Parser)]
#[command(
    name = "allure-publisher",
    version,
    about = "Publish Allure reports to a GitHub Pages branch with run history"
)]
struct Cli {
    /// Directory with raw test-result files to publish.
    #[arg(long, env = "INPUT_REPORT_DIR", default_value = "allure-results")]
    report_dir: PathBuf,

    /// Checkout of the gh-pages branch the report tree lives under.
    #[arg(long, env = "INPUT_GH_PAGES", default_value = "gh-pages")]
    gh_pages: PathBuf,

    /// Sub-scope discriminator within a branch (e.g. per test suite).
    #[arg(long, env = "INPUT_REPORT_ID", default_value = "default")]
    report_id: String,

    /// Generate directory-listing pages while publishing.
    #[arg(long, env = "INPUT_LIST_DIRS", default_value = "false")]
    list_dirs: String,

    /// Run retention sweeps after a successful publish.
    #[arg(long, env = "INPUT_CLEANUP_ENABLED", default_value = "false")]
    cleanup_enabled: String,

    /// Retention cap on run directories per scope. A value that is not a
    /// positive integer disables the report sweep.
    #[arg(long, env = "INPUT_MAX_REPORTS", default_value = "20")]
    max_reports: String,

    /// Allure commandline binary.
    #[arg(long, env = "ALLURE_BIN", default_value = DEFAULT_ALLURE_BIN)]
    allure_bin: PathBuf,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    // Captured once: this timestamp disambiguates retries of the same
    // provider run for the rest of the invocation.
    let run_timestamp = Utc::now().timestamp_millis();
    let ctx = GithubContext::from_env()?;

    let opts = PublishOptions {
        results_dir: cli.report_dir,
        pages_dir: cli.gh_pages,
        report_id: cli.report_id,
        list_dirs: cli.list_dirs == "true",
        retention: RetentionPolicy::from_inputs(cli.cleanup_enabled == "true", &cli.max_reports),
        run_timestamp,
    };
    info!(
        results_dir = %opts.results_dir.display(),
        pages_dir = %opts.pages_dir.display(),
        report_id = %opts.report_id,
        branch = %ctx.branch(),
        run_id = ctx.run_id,
        run_timestamp,
        list_dirs = opts.list_dirs,
        retention = ?opts.retention,
        "resolved inputs"
    );

    let generator = AllureCommandline::new(&cli.allure_bin);
    let outcome = run_publish(&opts, &ctx, &generator)?;

    let github_output = env::var_os("GITHUB_OUTPUT").map(PathBuf::from);
    write_outputs(&outcome, github_output.as_deref())?;

    // Housekeeping only after every primary output is set.
    let lookup = GitRemote::new(&opts.pages_dir);
    run_retention(&opts, &lookup);
    Ok(())
}
