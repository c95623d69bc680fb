use crate::error::{Result, SpectestError};
use crate::paths;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// InstallEnv
// ---------------------------------------------------------------------------

/// The parts of the user's environment that decide where completions go.
///
/// Resolved once from the process environment by [`InstallEnv::from_env`];
/// tests build one directly against a temporary home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallEnv {
    pub home: PathBuf,
    /// `$ZDOTDIR`, where zsh looks for its startup files.
    pub zdotdir: Option<PathBuf>,
    /// `$ZSH`, the Oh My Zsh installation.
    pub oh_my_zsh: Option<PathBuf>,
    /// `$ZSH_CUSTOM`, the Oh My Zsh custom directory.
    pub oh_my_zsh_custom: Option<PathBuf>,
}

impl InstallEnv {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            zdotdir: None,
            oh_my_zsh: None,
            oh_my_zsh_custom: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let home = home::home_dir()
            .filter(|h| !h.as_os_str().is_empty())
            .ok_or(SpectestError::HomeNotFound)?;
        Ok(Self {
            home,
            zdotdir: env_path("ZDOTDIR"),
            oh_my_zsh: env_path("ZSH"),
            oh_my_zsh_custom: env_path("ZSH_CUSTOM"),
        })
    }

    /// `${ZDOTDIR:-$HOME}/.zshrc`.
    pub fn zshrc(&self) -> PathBuf {
        self.zdotdir
            .as_deref()
            .unwrap_or(&self.home)
            .join(paths::ZSHRC)
    }

    /// The Oh My Zsh root, if one is installed.
    ///
    /// `$ZSH` wins when it names an existing directory; otherwise
    /// `~/.oh-my-zsh` is used when present.
    pub fn oh_my_zsh_root(&self) -> Option<PathBuf> {
        if let Some(dir) = self.oh_my_zsh.as_deref().filter(|d| d.is_dir()) {
            return Some(dir.to_path_buf());
        }
        let default = self.home.join(paths::OH_MY_ZSH_DIR);
        default.is_dir().then_some(default)
    }

    /// `$ZSH_CUSTOM`, defaulting to `<oh-my-zsh root>/custom`.
    pub fn oh_my_zsh_custom_dir(&self, omz_root: &Path) -> PathBuf {
        self.oh_my_zsh_custom
            .clone()
            .unwrap_or_else(|| omz_root.join("custom"))
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn zshrc_honours_zdotdir() {
        let mut env = InstallEnv::new("/home/u");
        assert_eq!(env.zshrc(), PathBuf::from("/home/u/.zshrc"));

        env.zdotdir = Some(PathBuf::from("/home/u/.config/zsh"));
        assert_eq!(env.zshrc(), PathBuf::from("/home/u/.config/zsh/.zshrc"));
    }

    #[test]
    fn oh_my_zsh_detected_from_default_dir() {
        let home = TempDir::new().unwrap();
        let env = InstallEnv::new(home.path());
        assert!(env.oh_my_zsh_root().is_none());

        std::fs::create_dir_all(home.path().join(".oh-my-zsh")).unwrap();
        assert_eq!(env.oh_my_zsh_root(), Some(home.path().join(".oh-my-zsh")));
    }

    #[test]
    fn oh_my_zsh_var_must_exist() {
        let home = TempDir::new().unwrap();
        let mut env = InstallEnv::new(home.path());
        env.oh_my_zsh = Some(home.path().join("nowhere"));
        assert!(env.oh_my_zsh_root().is_none());

        let custom = home.path().join("omz");
        std::fs::create_dir_all(&custom).unwrap();
        env.oh_my_zsh = Some(custom.clone());
        assert_eq!(env.oh_my_zsh_root(), Some(custom.clone()));
        assert_eq!(env.oh_my_zsh_custom_dir(&custom), custom.join("custom"));
    }
}
