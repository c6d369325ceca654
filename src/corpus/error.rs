//! Corpus error taxonomy.
//!
//! Per-file errors (`UnreadableFile`, `MalformedDocument`) are recorded in
//! the load report, never raised mid-aggregation, so a single bad post does
//! not block indexing the rest of the corpus. `EmptyInput` is the only fatal
//! variant: an index over nothing is a build misconfiguration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading the corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read `{0}`")]
    UnreadableFile(PathBuf, #[source] std::io::Error),

    #[error("front matter in `{0}` opens with `---` but never closes")]
    MalformedDocument(PathBuf),

    #[error("no markdown files found under `{0}`")]
    EmptyInput(PathBuf),
}

impl CorpusError {
    /// Whether this error aborts the whole build (outside strict mode).
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::EmptyInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_error_display() {
        let io_err = CorpusError::UnreadableFile(
            PathBuf::from("_posts/a.md"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("failed to read"));
        assert!(display.contains("_posts/a.md"));

        let malformed = CorpusError::MalformedDocument(PathBuf::from("b.md"));
        assert!(format!("{malformed}").contains("never closes"));
    }

    #[test]
    fn test_only_empty_input_is_fatal() {
        assert!(CorpusError::EmptyInput(PathBuf::from("_posts")).is_fatal());
        assert!(!CorpusError::MalformedDocument(PathBuf::from("b.md")).is_fatal());
        assert!(
            !CorpusError::UnreadableFile(
                PathBuf::from("a.md"),
                Error::new(ErrorKind::NotFound, "gone"),
            )
            .is_fatal()
        );
    }
}
