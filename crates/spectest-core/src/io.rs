use crate::error::{Result, SpectestError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
///
/// An existing target keeps its permissions, and a symlinked target is
/// written through (the link itself is left in place).
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let target = resolve_target(path);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let permissions = std::fs::metadata(&target).ok().map(|m| m.permissions());
    let dir = target.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

fn resolve_target(path: &Path) -> PathBuf {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Append text to a file, creating it if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// Byte range of the first `start_marker` ... `end_marker` block, end-inclusive.
///
/// `Ok(None)` when the start marker is absent. A start marker without a
/// matching end marker is a [`SpectestError::MissingMarker`].
pub fn find_marked_block(
    path: &Path,
    content: &str,
    start_marker: &str,
    end_marker: &str,
) -> Result<Option<(usize, usize)>> {
    let Some(start_pos) = content.find(start_marker) else {
        return Ok(None);
    };
    let search_from = start_pos + start_marker.len();
    let Some(end_offset) = content[search_from..].find(end_marker) else {
        return Err(SpectestError::MissingMarker {
            path: path.to_path_buf(),
            marker: end_marker.to_string(),
        });
    };
    Ok(Some((start_pos, search_from + end_offset + end_marker.len())))
}

/// Replace content between `start_marker` and `end_marker` (inclusive) in a file.
///
/// Both markers must be present; otherwise the file is left unmodified and a
/// [`SpectestError::MissingMarker`] naming the file is returned. Returns
/// `true` if the file content changed.
pub fn replace_between_markers(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> Result<bool> {
    let content = std::fs::read_to_string(path)?;
    let Some((start_pos, end_pos)) = find_marked_block(path, &content, start_marker, end_marker)?
    else {
        return Err(SpectestError::MissingMarker {
            path: path.to_path_buf(),
            marker: start_marker.to_string(),
        });
    };

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..start_pos]);
    updated.push_str(replacement);
    updated.push_str(&content[end_pos..]);

    if updated == content {
        return Ok(false);
    }
    atomic_write(path, updated.as_bytes())?;
    Ok(true)
}

/// Remove a marked block previously added with a leading and trailing newline.
///
/// Strips the block, the newline that follows it and one newline before it,
/// which restores the bytes the file had before the block was appended.
/// Returns `false` if the file has no such block.
pub fn remove_marked_block(path: &Path, start_marker: &str, end_marker: &str) -> Result<bool> {
    let content = std::fs::read_to_string(path)?;
    let Some((mut start_pos, mut end_pos)) =
        find_marked_block(path, &content, start_marker, end_marker)?
    else {
        return Ok(false);
    };

    if content[end_pos..].starts_with('\n') {
        end_pos += 1;
    }
    if content[..start_pos].ends_with('\n') {
        start_pos -= 1;
    }

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..start_pos]);
    updated.push_str(&content[end_pos..]);
    atomic_write(path, updated.as_bytes())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const START: &str = "# >>> tool >>>";
    const END: &str = "# <<< tool <<<";

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/_tool");
        atomic_write(&path, b"data").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".zshrc");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        atomic_write(&path, b"new").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_follows_symlink() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("dotfiles-zshrc");
        let link = dir.path().join(".zshrc");
        std::fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        atomic_write(&link, b"new").unwrap();
        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "new");
    }

    #[test]
    fn replace_between_markers_updates_block_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc");
        std::fs::write(&path, format!("before\n{START}\nold\n{END}\nafter\n")).unwrap();

        let changed =
            replace_between_markers(&path, START, END, &format!("{START}\nnew\n{END}")).unwrap();
        assert!(changed);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("before\n{START}\nnew\n{END}\nafter\n")
        );
    }

    #[test]
    fn replace_between_markers_fails_without_end_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc");
        let original = format!("before\n{START}\ndangling\n");
        std::fs::write(&path, &original).unwrap();

        let err = replace_between_markers(&path, START, END, "x").unwrap_err();
        assert!(matches!(err, SpectestError::MissingMarker { ref marker, .. } if marker == END));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn replace_between_markers_fails_without_start_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc");
        std::fs::write(&path, "plain\n").unwrap();

        let err = replace_between_markers(&path, START, END, "x").unwrap_err();
        assert!(matches!(err, SpectestError::MissingMarker { ref marker, .. } if marker == START));
    }

    #[test]
    fn remove_marked_block_restores_appended_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc");
        for original in ["", "export A=1\n", "no-trailing-newline"] {
            std::fs::write(&path, original).unwrap();
            append_text(&path, &format!("\n{START}\nbody\n{END}\n")).unwrap();

            assert!(remove_marked_block(&path, START, END).unwrap());
            assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        }
    }

    #[test]
    fn remove_marked_block_without_block_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc");
        std::fs::write(&path, "alias ll='ls -l'\n").unwrap();
        assert!(!remove_marked_block(&path, START, END).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alias ll='ls -l'\n");
    }
}
