use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Project layout
// ---------------------------------------------------------------------------

pub const SPECTEST_DIR: &str = "spectest";
pub const CHANGES_DIR: &str = "spectest/changes";
pub const SPECS_DIR: &str = "spectest/specs";
pub const ARCHIVE_DIR_NAME: &str = "archive";

pub const PROPOSAL_MD: &str = "proposal.md";
pub const SPEC_MD: &str = "spec.md";

pub fn spectest_dir(root: &Path) -> PathBuf {
    root.join(SPECTEST_DIR)
}

pub fn changes_dir(root: &Path) -> PathBuf {
    root.join(CHANGES_DIR)
}

pub fn archive_dir(root: &Path) -> PathBuf {
    changes_dir(root).join(ARCHIVE_DIR_NAME)
}

pub fn specs_dir(root: &Path) -> PathBuf {
    root.join(SPECS_DIR)
}

// ---------------------------------------------------------------------------
// Zsh user paths
// ---------------------------------------------------------------------------

pub const ZSHRC: &str = ".zshrc";
pub const ZSH_COMPLETIONS_DIR: &str = ".zsh/completions";
pub const OH_MY_ZSH_DIR: &str = ".oh-my-zsh";
pub const OH_MY_ZSH_CUSTOM_COMPLETIONS: &str = "completions";
