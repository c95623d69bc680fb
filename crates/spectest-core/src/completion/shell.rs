use crate::error::SpectestError;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Zsh,
}

impl Shell {
    pub fn all() -> &'static [Shell] {
        &[Shell::Zsh]
    }

    pub fn names() -> &'static [&'static str] {
        &["zsh"]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
        }
    }

    /// Comma-separated list of supported shells, for messages.
    pub fn supported_list() -> String {
        Self::names().join(", ")
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Shell {
    type Err = SpectestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Shell::all()
            .iter()
            .copied()
            .find(|shell| shell.as_str() == normalized)
            .ok_or_else(|| SpectestError::UnsupportedShell {
                shell: normalized,
                supported: Shell::supported_list(),
            })
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellDetection {
    /// The detected shell, when it is one we support.
    pub shell: Option<Shell>,
    /// The raw shell name that was detected, supported or not.
    pub detected: Option<String>,
}

/// Detect the user's shell from `$SHELL`.
pub fn detect_shell() -> ShellDetection {
    detect_from(std::env::var("SHELL").ok().as_deref())
}

/// Detection against an explicit `$SHELL` value (a path such as `/bin/zsh`).
pub fn detect_from(shell_var: Option<&str>) -> ShellDetection {
    let Some(name) = shell_var
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| Path::new(v).file_name())
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
    else {
        return ShellDetection::default();
    };

    // Login shells are sometimes reported with a leading dash (`-zsh`).
    let name = name.trim_start_matches('-').to_string();
    ShellDetection {
        shell: name.parse().ok(),
        detected: Some(name),
    }
}
