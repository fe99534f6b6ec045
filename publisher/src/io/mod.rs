//! Side-effecting operations for the publish sequence.

pub mod cleanup;
pub mod executor_meta;
pub mod generator;
pub mod git_remote;
pub mod github;
pub mod history;
pub mod last_run;
pub mod listing;
pub mod outputs;
pub mod probe;
pub mod results;
pub mod trend;
