//! Static listing pages for browsing the published tree.
//!
//! Two flavors: the scope listing (`index.html` next to `data.json`) renders
//! the run history from the ledger client-side, and plain folder listings
//! let users navigate from the pages root down to a scope. Pages written by
//! this tool carry a marker comment so a user's own site root is never
//! overwritten.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::io::probe::exists;

/// Marker identifying pages generated by this tool.
const MARKER: &str = "<!-- generated by allure-publisher -->";

/// Scope listing: loads the sibling `data.json` and renders one link per
/// run, newest first (the ledger is already newest-first).
const SCOPE_LISTING: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Report history</title>
<style>
body { font-family: sans-serif; margin: 2rem; }
li { margin: 0.25rem 0; }
.result { display: inline-block; width: 2rem; }
</style>
</head>
<body>
<h1>Report history</h1>
<ul id="runs"></ul>
<script>
fetch('data.json')
  .then((response) => response.json())
  .then((records) => {
    const icons = { PASS: '✅', FAIL: '❌', UNKNOWN: '❔' };
    const list = document.getElementById('runs');
    for (const record of records) {
      const item = document.createElement('li');
      const icon = icons[record.testResult] || icons.UNKNOWN;
      const when = record.timestamp ? new Date(record.timestamp).toISOString() : 'unknown time';
      item.innerHTML = '<span class="result">' + icon + '</span>' +
        '<a href="' + record.runUniqueId + '/">' + record.runUniqueId + '</a> ' + when;
      list.appendChild(item);
    }
  });
</script>
</body>
</html>
"#;

/// Write the scope's `index.html` history page.
pub fn write_scope_listing(scope_dir: &Path) -> Result<()> {
    let path = scope_dir.join("index.html");
    debug!(path = %path.display(), "writing scope listing");
    let page = format!("{MARKER}\n{SCOPE_LISTING}");
    fs::write(&path, page).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write a plain directory listing for `root/rel`, linking each
/// subdirectory.
pub fn write_folder_listing(root: &Path, rel: &str) -> Result<()> {
    let dir = if rel == "." { root.to_path_buf() } else { root.join(rel) };
    let mut names = Vec::new();
    let entries =
        fs::read_dir(&dir).with_context(|| format!("read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if file_type.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let mut items = String::new();
    for name in names {
        items.push_str(&format!("<li><a href=\"{name}/\">{name}</a></li>\n"));
    }
    let page = format!(
        "{MARKER}\n<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{rel}</title></head>\n<body>\n<h1>{rel}</h1>\n<ul>\n{items}</ul>\n</body>\n</html>\n"
    );
    let path = dir.join("index.html");
    debug!(path = %path.display(), "writing folder listing");
    fs::write(&path, page).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Whether the pages root `index.html` may be (re)written.
///
/// True when it is absent or was generated by this tool; false when the user
/// hosts their own site at the root.
pub fn should_write_root_listing(pages_dir: &Path) -> Result<bool> {
    let path = pages_dir.join("index.html");
    if !exists(&path)? {
        return Ok(true);
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    Ok(contents.starts_with(MARKER))
}
