use crate::output::write_stdout;
use spectest_core::completion::CompletionProvider;
use std::path::Path;

/// Print candidates for `kind`; `false` on any failure.
///
/// Nothing reaches stdout unless the whole candidate list was produced, and
/// errors are only logged at debug level so they stay out of the prompt.
pub fn run(root: &Path, kind: &str) -> bool {
    let rendered = match CompletionProvider::new(root).render(kind) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::debug!(kind, error = %e, "completion candidates unavailable");
            return false;
        }
    };

    write_stdout(&rendered).is_ok()
}
