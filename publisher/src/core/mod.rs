//! Pure, deterministic publisher logic.

pub mod retention;
pub mod scope;
pub mod verdict;
