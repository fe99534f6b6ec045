//! Allure report publisher for a GitHub Pages checkout.
//!
//! This crate publishes the report generated from a test run into a gh-pages
//! working tree, keeping a rolling per-branch history of runs. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (verdicts, retention selection,
//!   scope paths and URLs). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (filesystem stores, git lookups,
//!   process execution, GitHub env/outputs). Isolated to enable faking in
//!   tests.
//!
//! [`publish`] coordinates core logic with I/O to implement the publish
//! sequence: carry history forward, generate the report, update the trend
//! ledger, advance the last-run pointer, then run retention sweeps.

pub mod core;
pub mod io;
pub mod logging;
pub mod publish;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
