use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpectestError {
    #[error("shell '{shell}' is not supported yet (currently supported: {supported})")]
    UnsupportedShell { shell: String, supported: String },

    #[error("could not auto-detect shell; specify one explicitly")]
    ShellNotDetected,

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("marker '{marker}' not found in {}", path.display())]
    MissingMarker { path: PathBuf, marker: String },

    #[error("unknown completion type: {0}")]
    UnknownCandidateKind(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpectestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_shell_lists_supported_set() {
        let err = SpectestError::UnsupportedShell {
            shell: "fish".to_string(),
            supported: "zsh".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'fish'"));
        assert!(msg.contains("currently supported: zsh"));
    }

    #[test]
    fn missing_marker_names_file() {
        let err = SpectestError::MissingMarker {
            path: PathBuf::from("/home/u/.zshrc"),
            marker: "# <<< end".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".zshrc"));
        assert!(msg.contains("# <<< end"));
    }
}
