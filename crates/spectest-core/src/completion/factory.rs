//! Name-to-implementation lookup for generators and installers.

use super::generators::ZshGenerator;
use super::installers::ZshInstaller;
use super::{CompletionGenerator, CompletionInstaller, Shell};
use crate::config::InstallEnv;
use crate::error::Result;

pub struct CompletionFactory;

impl CompletionFactory {
    /// Generator for `shell`; names are matched case-insensitively.
    pub fn create_generator(shell: &str) -> Result<Box<dyn CompletionGenerator>> {
        let generator: Box<dyn CompletionGenerator> = match shell.parse::<Shell>()? {
            Shell::Zsh => Box::new(ZshGenerator::default()),
        };
        Ok(generator)
    }

    pub fn create_installer(shell: &str, env: InstallEnv) -> Result<Box<dyn CompletionInstaller>> {
        let installer: Box<dyn CompletionInstaller> = match shell.parse::<Shell>()? {
            Shell::Zsh => Box::new(ZshInstaller::new(env)),
        };
        Ok(installer)
    }

    pub fn is_supported(shell: &str) -> bool {
        shell.parse::<Shell>().is_ok()
    }

    pub fn supported_shells() -> Vec<Shell> {
        Shell::all().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpectestError;

    #[test]
    fn creates_zsh_pair() {
        let generator = CompletionFactory::create_generator("zsh").unwrap();
        assert_eq!(generator.shell(), Shell::Zsh);

        let env = InstallEnv::new("/nonexistent-home");
        let installer = CompletionFactory::create_installer("ZSH", env).unwrap();
        assert_eq!(installer.shell(), Shell::Zsh);
    }

    #[test]
    fn unsupported_shell_lists_supported() {
        let err = CompletionFactory::create_generator("fish").err().unwrap();
        assert!(matches!(err, SpectestError::UnsupportedShell { .. }));
        let msg = err.to_string();
        assert!(msg.contains("fish"));
        assert!(msg.contains("zsh"));

        let env = InstallEnv::new("/nonexistent-home");
        assert!(CompletionFactory::create_installer("bash", env).is_err());
    }

    #[test]
    fn supported_queries_agree() {
        assert!(CompletionFactory::is_supported("zsh"));
        assert!(CompletionFactory::is_supported(" Zsh "));
        assert!(!CompletionFactory::is_supported("powershell"));
        assert!(!CompletionFactory::is_supported(""));
        for shell in CompletionFactory::supported_shells() {
            assert!(CompletionFactory::is_supported(shell.as_str()));
            assert!(CompletionFactory::create_generator(shell.as_str()).is_ok());
        }
    }
}
