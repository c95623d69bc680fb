//! Installing the zsh completion script.
//!
//! The script is placed in a directory on `fpath`:
//! `$ZSH_CUSTOM/completions` under Oh My Zsh, `~/.zsh/completions`
//! otherwise. Outside Oh My Zsh a managed block in `.zshrc` puts that
//! directory on `fpath` and runs `compinit`.
//!
//! Steps run strictly in order and are not rolled back: a failure after the
//! script was written leaves the script in place. Two installs racing on the
//! same home directory are not guarded against.

use super::backup_path_for;
use crate::completion::generators::single_quote;
use crate::completion::{
    CompletionInstaller, InstallationResult, Shell, UninstallResult, OWNERSHIP_HEADER,
    PROGRAM_NAME,
};
use crate::config::InstallEnv;
use crate::error::{Result, SpectestError};
use crate::{io, paths};
use std::path::{Path, PathBuf};

/// First line of the managed block in `.zshrc`.
pub const BLOCK_START: &str = "# >>> spectest completion >>>";
/// Last line of the managed block in `.zshrc`.
pub const BLOCK_END: &str = "# <<< spectest completion <<<";

#[derive(Debug, Clone)]
pub struct ZshInstaller {
    env: InstallEnv,
    program: String,
}

/// Where the script goes for the current environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub script_path: PathBuf,
    /// Installed under Oh My Zsh, which manages `compinit` itself.
    pub oh_my_zsh: bool,
}

impl InstallTarget {
    pub fn dir(&self) -> &Path {
        self.script_path.parent().unwrap_or(Path::new("."))
    }
}

/// Outcome of the `.zshrc` step.
struct Activation {
    configured: bool,
    instructions: Vec<String>,
}

impl ZshInstaller {
    pub fn new(env: InstallEnv) -> Self {
        Self {
            env,
            program: PROGRAM_NAME.to_string(),
        }
    }

    fn script_name(&self) -> String {
        format!("_{}", self.program)
    }

    pub fn target(&self) -> InstallTarget {
        match self.env.oh_my_zsh_root() {
            Some(omz) => InstallTarget {
                script_path: self
                    .env
                    .oh_my_zsh_custom_dir(&omz)
                    .join(paths::OH_MY_ZSH_CUSTOM_COMPLETIONS)
                    .join(self.script_name()),
                oh_my_zsh: true,
            },
            None => InstallTarget {
                script_path: self.default_script_path(),
                oh_my_zsh: false,
            },
        }
    }

    fn default_script_path(&self) -> PathBuf {
        self.env
            .home
            .join(paths::ZSH_COMPLETIONS_DIR)
            .join(self.script_name())
    }

    /// Every location an earlier install may have used.
    fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut candidates = vec![self.target().script_path];
        let default = self.default_script_path();
        if !candidates.contains(&default) {
            candidates.push(default);
        }
        candidates
    }

    /// The `.zshrc` block that activates completions from `dir`.
    pub fn managed_block(&self, dir: &Path) -> String {
        [
            BLOCK_START.to_string(),
            format!(
                "# Managed by {0}; remove with `{0} completion uninstall`",
                self.program
            ),
            format!("fpath=({} $fpath)", single_quote(&dir.to_string_lossy())),
            "autoload -Uz compinit".to_string(),
            "compinit".to_string(),
            BLOCK_END.to_string(),
        ]
        .join("\n")
    }

    // -----------------------------------------------------------------------
    // install
    // -----------------------------------------------------------------------

    /// Run the install steps, recording each completed one in `done`.
    ///
    /// On error `done` still holds the paths already touched, so the failure
    /// result can report them.
    fn try_install(&self, script: &str, done: &mut InstallationResult) -> Result<()> {
        let target = self.target();
        let path = &target.script_path;
        tracing::debug!(path = %path.display(), oh_my_zsh = target.oh_my_zsh, "zsh install target");

        done.backup_path = self.backup_foreign_script(path)?;

        io::ensure_dir(target.dir())?;
        io::atomic_write(path, script.as_bytes())?;
        done.installed_path = Some(path.clone());
        tracing::info!(path = %path.display(), "wrote completion script");

        let activation = if target.oh_my_zsh {
            Activation {
                configured: false,
                instructions: self.oh_my_zsh_instructions(target.dir()),
            }
        } else {
            self.activate(target.dir())?
        };

        done.success = true;
        done.message = if done.backup_path.is_some() {
            "Zsh completion script installed (previous file backed up)".to_string()
        } else {
            "Zsh completion script installed".to_string()
        };
        done.configured = Some(activation.configured);
        done.instructions = activation.instructions;
        Ok(())
    }

    /// Copy a file we did not generate out of the way.
    ///
    /// A file carrying our ownership header is a previous install and is
    /// simply overwritten, so repeated installs never create a backup.
    fn backup_foreign_script(&self, path: &Path) -> Result<Option<PathBuf>> {
        if !path.is_file() {
            return Ok(None);
        }
        let existing = std::fs::read(path)?;
        if String::from_utf8_lossy(&existing).contains(OWNERSHIP_HEADER) {
            tracing::debug!(path = %path.display(), "replacing previous spectest install");
            return Ok(None);
        }

        let backup = backup_path_for(path);
        std::fs::copy(path, &backup)?;
        tracing::info!(backup = %backup.display(), "backed up existing completion file");
        Ok(Some(backup))
    }

    /// Add or refresh the managed block in `.zshrc`.
    ///
    /// A missing or unwritable `.zshrc` falls back to manual instructions. A
    /// block whose end marker is gone is an error and the file is untouched.
    fn activate(&self, dir: &Path) -> Result<Activation> {
        let zshrc = self.env.zshrc();
        let block = self.managed_block(dir);

        if !zshrc.is_file() {
            tracing::warn!(path = %zshrc.display(), "no .zshrc; skipping auto-configuration");
            return Ok(self.manual_activation(&zshrc, &block));
        }

        let content = match std::fs::read_to_string(&zshrc) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %zshrc.display(), error = %e, "cannot read .zshrc");
                return Ok(self.manual_activation(&zshrc, &block));
            }
        };

        let written = if content.contains(BLOCK_START) {
            io::replace_between_markers(&zshrc, BLOCK_START, BLOCK_END, &block).map(|_| ())
        } else {
            io::append_text(&zshrc, &format!("\n{block}\n"))
        };

        match written {
            Ok(()) => {
                tracing::info!(path = %zshrc.display(), "configured .zshrc");
                Ok(Activation {
                    configured: true,
                    instructions: Vec::new(),
                })
            }
            Err(e @ SpectestError::MissingMarker { .. }) => Err(e),
            Err(e) => {
                tracing::warn!(path = %zshrc.display(), error = %e, "cannot update .zshrc");
                Ok(self.manual_activation(&zshrc, &block))
            }
        }
    }

    fn manual_activation(&self, zshrc: &Path, block: &str) -> Activation {
        let mut instructions = vec![format!(
            "To enable completions, add the following to {}:",
            zshrc.display()
        )];
        instructions.extend(block.lines().map(|l| format!("  {l}")));
        instructions.push("Then restart your shell or run: exec zsh".to_string());
        Activation {
            configured: false,
            instructions,
        }
    }

    fn oh_my_zsh_instructions(&self, dir: &Path) -> Vec<String> {
        vec![
            "Oh My Zsh detected; it runs compinit itself.".to_string(),
            format!(
                "Make sure {} is on fpath before oh-my-zsh.sh is sourced in {}:",
                dir.display(),
                self.env.zshrc().display()
            ),
            format!("  fpath=({} $fpath)", single_quote(&dir.to_string_lossy())),
            "Then restart your shell or run: exec zsh".to_string(),
        ]
    }

    // -----------------------------------------------------------------------
    // uninstall
    // -----------------------------------------------------------------------

    fn try_uninstall(&self) -> Result<UninstallResult> {
        let mut removed: Vec<String> = Vec::new();
        let mut notes: Vec<String> = Vec::new();

        let zshrc = self.env.zshrc();
        if zshrc.is_file() && io::remove_marked_block(&zshrc, BLOCK_START, BLOCK_END)? {
            tracing::info!(path = %zshrc.display(), "removed managed block");
            removed.push(format!("configuration from {}", zshrc.display()));
        }

        for path in self.candidate_paths() {
            if !path.is_file() {
                continue;
            }
            let content = std::fs::read(&path)?;
            if String::from_utf8_lossy(&content).contains(OWNERSHIP_HEADER) {
                std::fs::remove_file(&path)?;
                tracing::info!(path = %path.display(), "removed completion script");
                removed.push(path.display().to_string());
            } else {
                notes.push(format!(
                    "Left {} in place: it was not generated by {}",
                    path.display(),
                    self.program
                ));
            }
            let backup = backup_path_for(&path);
            if backup.is_file() {
                notes.push(format!(
                    "A backup of the previous file remains at {}",
                    backup.display()
                ));
            }
        }

        if removed.is_empty() {
            let mut message = "No spectest zsh completion installation found".to_string();
            for note in &notes {
                message.push_str(&format!("\n{note}"));
            }
            return Ok(UninstallResult {
                success: false,
                message,
            });
        }

        let mut message = format!("Removed {}", removed.join(" and "));
        for note in &notes {
            message.push_str(&format!("\n{note}"));
        }
        Ok(UninstallResult {
            success: true,
            message,
        })
    }
}

impl CompletionInstaller for ZshInstaller {
    fn shell(&self) -> Shell {
        Shell::Zsh
    }

    fn install(&self, script: &str) -> InstallationResult {
        let mut result = InstallationResult::failure(String::new());
        if let Err(e) = self.try_install(script, &mut result) {
            tracing::debug!(error = %e, "zsh install failed");
            let mut message = format!("Failed to install completion script: {e}");
            if let Some(path) = &result.installed_path {
                message.push_str(&format!("\nThe new script was already written to {}", path.display()));
            }
            if let Some(backup) = &result.backup_path {
                message.push_str(&format!("\nThe previous file was backed up to {}", backup.display()));
            }
            result.success = false;
            result.message = message;
        }
        result
    }

    fn uninstall(&self) -> UninstallResult {
        self.try_uninstall().unwrap_or_else(|e| UninstallResult {
            success: false,
            message: format!("Failed to uninstall completion script: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::generators::ZshGenerator;
    use crate::completion::{command_registry, CompletionGenerator};
    use tempfile::TempDir;

    const ZSHRC: &str = "export PATH=\"$HOME/bin:$PATH\"\nalias ll='ls -l'\n";

    fn script() -> String {
        ZshGenerator::default().generate(command_registry())
    }

    fn home_with_zshrc() -> (TempDir, ZshInstaller) {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join(".zshrc"), ZSHRC).unwrap();
        let installer = ZshInstaller::new(InstallEnv::new(home.path()));
        (home, installer)
    }

    fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in std::fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    files.push((path.clone(), std::fs::read(&path).unwrap()));
                }
            }
        }
        files.sort();
        files
    }

    #[test]
    fn install_fresh_writes_script_and_configures_zshrc() {
        let (home, installer) = home_with_zshrc();
        let result = installer.install(&script());

        assert!(result.success, "{}", result.message);
        let installed = home.path().join(".zsh/completions/_spectest");
        assert_eq!(result.installed_path.as_deref(), Some(installed.as_path()));
        assert_eq!(result.backup_path, None);
        assert_eq!(result.configured, Some(true));
        assert!(result.instructions.is_empty());

        assert_eq!(std::fs::read_to_string(&installed).unwrap(), script());
        let zshrc = std::fs::read_to_string(home.path().join(".zshrc")).unwrap();
        assert!(zshrc.starts_with(ZSHRC));
        assert!(zshrc.contains(BLOCK_START));
        assert!(zshrc.contains(BLOCK_END));
        assert!(zshrc.contains(&format!("fpath=('{}' $fpath)", installed.parent().unwrap().display())));
    }

    #[test]
    fn install_twice_is_idempotent() {
        let (home, installer) = home_with_zshrc();
        let first = installer.install(&script());
        assert!(first.success);
        let after_first = snapshot(home.path());

        let second = installer.install(&script());
        assert!(second.success);
        assert_eq!(second.backup_path, None);
        assert_eq!(snapshot(home.path()), after_first);
    }

    #[test]
    fn install_then_uninstall_restores_zshrc() {
        let (home, installer) = home_with_zshrc();
        assert!(installer.install(&script()).success);

        let result = installer.uninstall();
        assert!(result.success, "{}", result.message);
        assert!(!home.path().join(".zsh/completions/_spectest").exists());
        assert_eq!(
            std::fs::read_to_string(home.path().join(".zshrc")).unwrap(),
            ZSHRC
        );
    }

    #[test]
    fn install_over_foreign_file_creates_backup() {
        let (home, installer) = home_with_zshrc();
        let path = home.path().join(".zsh/completions/_spectest");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "#compdef spectest\n# hand-written\n").unwrap();

        let result = installer.install(&script());
        assert!(result.success);
        let backup = result.backup_path.expect("backup created");
        assert_eq!(backup, home.path().join(".zsh/completions/_spectest.spectest-backup"));
        assert_eq!(
            std::fs::read_to_string(&backup).unwrap(),
            "#compdef spectest\n# hand-written\n"
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), script());

        // Second install sees our own header and leaves the backup alone.
        let again = installer.install(&script());
        assert_eq!(again.backup_path, None);
        assert_eq!(
            std::fs::read_to_string(&backup).unwrap(),
            "#compdef spectest\n# hand-written\n"
        );
    }

    #[test]
    fn install_without_zshrc_returns_instructions() {
        let home = TempDir::new().unwrap();
        let installer = ZshInstaller::new(InstallEnv::new(home.path()));

        let result = installer.install(&script());
        assert!(result.success);
        assert_eq!(result.configured, Some(false));
        assert!(!result.instructions.is_empty());
        assert!(result.instructions.iter().any(|l| l.contains("fpath=(")));
        assert!(!home.path().join(".zshrc").exists());
        assert!(home.path().join(".zsh/completions/_spectest").exists());
    }

    #[test]
    fn install_uses_zdotdir() {
        let home = TempDir::new().unwrap();
        let zdot = home.path().join(".config/zsh");
        std::fs::create_dir_all(&zdot).unwrap();
        std::fs::write(zdot.join(".zshrc"), "").unwrap();

        let mut env = InstallEnv::new(home.path());
        env.zdotdir = Some(zdot.clone());
        let result = ZshInstaller::new(env).install(&script());

        assert_eq!(result.configured, Some(true));
        let zshrc = std::fs::read_to_string(zdot.join(".zshrc")).unwrap();
        assert!(zshrc.contains(BLOCK_START));
    }

    #[test]
    fn install_refreshes_existing_block_in_place() {
        let (home, installer) = home_with_zshrc();
        let zshrc_path = home.path().join(".zshrc");
        let stale = format!("{ZSHRC}\n{BLOCK_START}\nfpath=(/old $fpath)\n{BLOCK_END}\n# user tail\n");
        std::fs::write(&zshrc_path, &stale).unwrap();

        let result = installer.install(&script());
        assert!(result.success);
        let zshrc = std::fs::read_to_string(&zshrc_path).unwrap();
        assert!(!zshrc.contains("/old"));
        assert!(zshrc.ends_with(&format!("{BLOCK_END}\n# user tail\n")));
        assert_eq!(zshrc.matches(BLOCK_START).count(), 1);
    }

    #[test]
    fn install_with_broken_block_fails_and_leaves_zshrc() {
        let (home, installer) = home_with_zshrc();
        let zshrc_path = home.path().join(".zshrc");
        let broken = format!("{ZSHRC}{BLOCK_START}\nfpath=(/old $fpath)\n");
        std::fs::write(&zshrc_path, &broken).unwrap();

        let result = installer.install(&script());
        assert!(!result.success);
        assert!(result.message.contains(".zshrc"), "{}", result.message);
        assert_eq!(std::fs::read_to_string(&zshrc_path).unwrap(), broken);
    }

    #[test]
    fn failed_activation_still_reports_written_script_and_backup() {
        let (home, installer) = home_with_zshrc();
        let path = home.path().join(".zsh/completions/_spectest");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "# hand-written\n").unwrap();
        std::fs::write(home.path().join(".zshrc"), format!("{BLOCK_START}\n")).unwrap();

        let result = installer.install(&script());
        assert!(!result.success);
        let backup = home.path().join(".zsh/completions/_spectest.spectest-backup");
        assert_eq!(result.installed_path.as_deref(), Some(path.as_path()));
        assert_eq!(result.backup_path.as_deref(), Some(backup.as_path()));
        assert!(result.message.contains(&path.display().to_string()), "{}", result.message);
        assert!(result.message.contains(&backup.display().to_string()), "{}", result.message);
        assert_eq!(result.configured, None);
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "# hand-written\n");
    }

    #[test]
    fn install_under_oh_my_zsh_skips_zshrc() {
        let (home, installer) = home_with_zshrc();
        std::fs::create_dir_all(home.path().join(".oh-my-zsh")).unwrap();

        let result = installer.install(&script());
        assert!(result.success);
        let expected = home.path().join(".oh-my-zsh/custom/completions/_spectest");
        assert_eq!(result.installed_path.as_deref(), Some(expected.as_path()));
        assert_eq!(result.configured, Some(false));
        assert!(result.instructions.iter().any(|l| l.contains("Oh My Zsh")));
        assert_eq!(
            std::fs::read_to_string(home.path().join(".zshrc")).unwrap(),
            ZSHRC
        );

        assert!(installer.uninstall().success);
        assert!(!expected.exists());
    }

    #[test]
    fn uninstall_keeps_modified_script() {
        let (home, installer) = home_with_zshrc();
        assert!(installer.install(&script()).success);
        let path = home.path().join(".zsh/completions/_spectest");
        std::fs::write(&path, "# replaced by another tool\n").unwrap();

        let result = installer.uninstall();
        assert!(result.success);
        assert!(result.message.contains("Left"));
        assert!(path.exists());
        assert_eq!(
            std::fs::read_to_string(home.path().join(".zshrc")).unwrap(),
            ZSHRC
        );
    }

    #[test]
    fn uninstall_when_nothing_installed_reports_failure() {
        let (home, installer) = home_with_zshrc();
        let result = installer.uninstall();
        assert!(!result.success);
        assert_eq!(
            std::fs::read_to_string(home.path().join(".zshrc")).unwrap(),
            ZSHRC
        );
    }

    #[test]
    fn uninstall_mentions_leftover_backup() {
        let (home, installer) = home_with_zshrc();
        let path = home.path().join(".zsh/completions/_spectest");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "# foreign\n").unwrap();
        assert!(installer.install(&script()).success);

        let result = installer.uninstall();
        assert!(result.success);
        assert!(result.message.contains("backup"), "{}", result.message);
        assert!(!path.exists());
        assert!(backup_path_for(&path).exists());
    }

    #[test]
    fn uninstall_with_broken_block_fails() {
        let (home, installer) = home_with_zshrc();
        let zshrc_path = home.path().join(".zshrc");
        let broken = format!("{ZSHRC}{BLOCK_START}\n");
        std::fs::write(&zshrc_path, &broken).unwrap();

        let result = installer.uninstall();
        assert!(!result.success);
        assert!(result.message.contains("not found"));
        assert_eq!(std::fs::read_to_string(&zshrc_path).unwrap(), broken);
    }

    #[cfg(unix)]
    #[test]
    fn install_into_unwritable_dir_reports_failure() {
        use std::os::unix::fs::PermissionsExt;

        let (home, installer) = home_with_zshrc();
        let zsh_dir = home.path().join(".zsh");
        std::fs::create_dir_all(&zsh_dir).unwrap();
        std::fs::set_permissions(&zsh_dir, std::fs::Permissions::from_mode(0o500)).unwrap();

        // Root ignores directory permissions; nothing to assert there.
        if std::fs::write(zsh_dir.join("probe"), "x").is_ok() {
            return;
        }

        let result = installer.install(&script());
        std::fs::set_permissions(&zsh_dir, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to install completion script"));
    }
}
