//! Shell completion: a static command model compiled into shell scripts,
//! installed into (and removed from) the user's shell environment.

pub mod factory;
pub mod generators;
pub mod installers;
pub mod model;
pub mod provider;
pub mod registry;
pub mod shell;

pub use factory::CompletionFactory;
pub use model::{CommandBody, CommandDefinition, FlagDefinition, PositionalKind};
pub use provider::{Candidate, CandidateKind, CompletionProvider};
pub use registry::command_registry;
pub use shell::{detect_shell, Shell, ShellDetection};

use serde::Serialize;
use std::path::PathBuf;

/// Name the completion scripts bind to.
pub const PROGRAM_NAME: &str = "spectest";

/// Line present in every generated script; marks a file as ours.
pub const OWNERSHIP_HEADER: &str = "# Auto-generated by spectest - do not edit manually";

// ---------------------------------------------------------------------------
// Generator / installer seams
// ---------------------------------------------------------------------------

/// Compiles a command tree into a completion script for one shell.
///
/// Output must be deterministic: the same tree always yields the same bytes.
pub trait CompletionGenerator {
    fn shell(&self) -> Shell;
    fn generate(&self, commands: &[CommandDefinition]) -> String;
}

/// Places a generated script into the user's environment and removes it again.
pub trait CompletionInstaller {
    fn shell(&self) -> Shell;
    fn install(&self, script: &str) -> InstallationResult;
    fn uninstall(&self) -> UninstallResult;
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,
}

impl InstallationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            installed_path: None,
            backup_path: None,
            configured: None,
            instructions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UninstallResult {
    pub success: bool,
    pub message: String,
}

/// Turn a command name into a fragment usable in a shell function name.
pub fn sanitize_function_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
