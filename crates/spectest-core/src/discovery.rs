//! Discovery of change and spec identifiers from the project tree.
//!
//! Each function returns identifiers sorted lexicographically. A missing
//! directory is not an error: it simply yields no identifiers.

use crate::error::Result;
use crate::paths;
use std::path::Path;

/// Active changes: `spectest/changes/<id>/proposal.md`, excluding the archive.
pub fn active_change_ids(root: &Path) -> Result<Vec<String>> {
    list_dirs(&paths::changes_dir(root), |name, dir| {
        name != paths::ARCHIVE_DIR_NAME && dir.join(paths::PROPOSAL_MD).is_file()
    })
}

/// Specs: `spectest/specs/<id>/spec.md`.
pub fn spec_ids(root: &Path) -> Result<Vec<String>> {
    list_dirs(&paths::specs_dir(root), |_, dir| {
        dir.join(paths::SPEC_MD).is_file()
    })
}

/// Archived changes: every directory under `spectest/changes/archive/`.
pub fn archived_change_ids(root: &Path) -> Result<Vec<String>> {
    list_dirs(&paths::archive_dir(root), |_, _| true)
}

fn list_dirs(parent: &Path, keep: impl Fn(&str, &Path) -> bool) -> Result<Vec<String>> {
    if !parent.is_dir() {
        return Ok(Vec::new());
    }

    let mut ids = Vec::new();
    for entry in std::fs::read_dir(parent)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if keep(&name, &entry.path()) {
            ids.push(name);
        }
    }
    ids.sort();
    Ok(ids)
}
