use crate::output::{print_json, print_table};
use anyhow::Context;
use spectest_core::completion::CandidateKind;
use spectest_core::discovery;
use std::path::Path;

pub fn run(root: &Path, specs: bool, archived: bool, json: bool) -> anyhow::Result<()> {
    let kind = if specs {
        CandidateKind::Specs
    } else if archived {
        CandidateKind::ArchivedChanges
    } else {
        CandidateKind::Changes
    };

    let ids = match kind {
        CandidateKind::Changes => discovery::active_change_ids(root),
        CandidateKind::Specs => discovery::spec_ids(root),
        CandidateKind::ArchivedChanges => discovery::archived_change_ids(root),
    }
    .with_context(|| format!("failed to list {kind}"))?;

    if json {
        let items: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({ "id": id, "kind": kind.label() }))
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if ids.is_empty() {
        let noun = match kind {
            CandidateKind::Changes => "active changes",
            CandidateKind::Specs => "specs",
            CandidateKind::ArchivedChanges => "archived changes",
        };
        println!("No {noun} found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = ids
        .into_iter()
        .map(|id| vec![id, kind.label().to_string()])
        .collect();
    print_table(&["ID", "KIND"], &rows)
}
