pub mod zsh;

pub use zsh::ZshInstaller;

use std::path::{Path, PathBuf};

/// Suffix appended to a foreign completion file before it is overwritten.
pub const BACKUP_SUFFIX: &str = ".spectest-backup";

/// Sibling backup path for `path`.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}
