//! Existence/type probe used for branching logic throughout the publisher.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

/// What was found at a probed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Dir,
}

/// Check what exists at `path`.
///
/// "Not found" is a valid outcome (`Ok(None)`), not an error. Anything else
/// (permissions, I/O) propagates: silently treating it as absent could make
/// a first-run code path run against an existing scope.
pub fn probe(path: &Path) -> Result<Option<PathKind>> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(Some(PathKind::Dir)),
        Ok(_) => Ok(Some(PathKind::File)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("probe {}", path.display())),
    }
}

pub fn exists(path: &Path) -> Result<bool> {
    Ok(probe(path)?.is_some())
}
