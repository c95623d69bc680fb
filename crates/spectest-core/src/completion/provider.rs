//! Candidate lists queried by completion scripts at completion time.
//!
//! Wire format, one candidate per line: `<identifier>\t<label>\n`.

use crate::discovery;
use crate::error::{Result, SpectestError};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Changes,
    Specs,
    ArchivedChanges,
}

impl CandidateKind {
    pub fn all() -> &'static [CandidateKind] {
        &[
            CandidateKind::Changes,
            CandidateKind::Specs,
            CandidateKind::ArchivedChanges,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CandidateKind::Changes => "changes",
            CandidateKind::Specs => "specs",
            CandidateKind::ArchivedChanges => "archived-changes",
        }
    }

    /// Fixed label attached to every candidate of this kind.
    pub fn label(self) -> &'static str {
        match self {
            CandidateKind::Changes => "active change",
            CandidateKind::Specs => "specification",
            CandidateKind::ArchivedChanges => "archived change",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CandidateKind {
    type Err = SpectestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase();
        CandidateKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| SpectestError::UnknownCandidateKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub label: &'static str,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.label)
    }
}

#[derive(Debug, Clone)]
pub struct CompletionProvider {
    root: PathBuf,
}

impl CompletionProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Candidates of `kind`, in identifier order.
    ///
    /// Identifiers that would break the line protocol (tabs, newlines) are
    /// dropped.
    pub fn candidates(&self, kind: CandidateKind) -> Result<impl Iterator<Item = Candidate>> {
        let ids = match kind {
            CandidateKind::Changes => discovery::active_change_ids(&self.root)?,
            CandidateKind::Specs => discovery::spec_ids(&self.root)?,
            CandidateKind::ArchivedChanges => discovery::archived_change_ids(&self.root)?,
        };
        let label = kind.label();
        Ok(ids
            .into_iter()
            .filter(|id| !id.contains(&['\t', '\n', '\r'][..]))
            .map(move |id| Candidate { id, label }))
    }

    /// The complete response for a `--type` request.
    ///
    /// Rendered in full before anything is written, so a failure never
    /// leaves partial output behind.
    pub fn render(&self, kind: &str) -> Result<String> {
        let kind: CandidateKind = kind.parse()?;
        let mut out = String::new();
        for candidate in self.candidates(kind)? {
            out.push_str(&candidate.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}
