//! Document store access: candidate file discovery.
//!
//! The store is a flat or nested directory of Markdown files, one post per
//! file. It is read-only input; nothing here mutates it.

use crate::corpus::error::CorpusError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files skipped regardless of extension.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Collect every candidate post file under `dir`.
///
/// Hidden files and directories (dot-prefixed) are skipped, as are editor
/// droppings. The result is sorted by path for deterministic load order.
///
/// # Errors
///
/// `EmptyInput` when no candidate files exist, including the case where
/// `dir` itself is missing or unreadable. An index over nothing is a build
/// misconfiguration, so this is the one fatal discovery error.
pub fn collect_posts(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, CorpusError> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name().to_str().unwrap_or_default(), e.depth()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter(|e| has_extension(e.path(), extensions))
        .map(walkdir::DirEntry::into_path)
        .collect();

    if paths.is_empty() {
        return Err(CorpusError::EmptyInput(dir.to_path_buf()));
    }

    paths.sort();
    Ok(paths)
}

/// Dot-prefixed entries are hidden, except the walk root itself.
fn is_hidden(name: &str, depth: usize) -> bool {
    depth > 0 && name.starts_with('.')
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
