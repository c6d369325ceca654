//! The aggregate, queryable view over all documents.
//!
//! # Architecture
//!
//! ```text
//! CorpusIndex::load(paths)
//!     │
//!     ├── par_iter ──► Document::from_path   (independent, no shared state)
//!     │
//!     └── reduce ───► partition Ok/Err ──► from_documents()
//!                                              │
//!                                              ├── by_date     (desc, path-asc ties)
//!                                              └── by_category (first-appearance order)
//! ```
//!
//! `by_date` and `by_category` are pure derived views of the document
//! collection. They are recomputed by `from_documents`; there is no
//! independent mutation path for them.

use crate::corpus::{document::Document, error::CorpusError};
use rayon::prelude::*;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{
    cmp::Ordering,
    collections::HashMap,
    path::{Path, PathBuf},
};

// ============================================================================
// Load Report
// ============================================================================

/// Result of a corpus load: the index plus every per-file failure.
///
/// Partial-failure semantics: failures are collected and returned alongside
/// the successfully loaded documents, never raised mid-aggregation, so a
/// corpus with one bad post still indexes the other nine.
#[derive(Debug)]
pub struct LoadReport {
    pub index: CorpusIndex,
    pub failures: Vec<(PathBuf, CorpusError)>,
}

// ============================================================================
// Corpus Index
// ============================================================================

/// Documents keyed by path, with date- and category-ordered views.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    documents: HashMap<PathBuf, Document>,
    /// All paths, newest first; ties broken by ascending path.
    by_date: Vec<PathBuf>,
    /// Category → member paths, categories in first-appearance order,
    /// members in `by_date` order.
    by_category: Vec<(String, Vec<PathBuf>)>,
}

impl CorpusIndex {
    /// Parse every path into a document, in parallel, and build the index.
    ///
    /// Each file is parsed independently; aggregation is a single
    /// non-concurrent reduction after all parses complete.
    pub fn load(paths: Vec<PathBuf>) -> LoadReport {
        Self::load_with(paths, || {})
    }

    /// Like [`load`](Self::load), invoking `on_parsed` once per finished
    /// file (for progress display).
    pub fn load_with<F>(paths: Vec<PathBuf>, on_parsed: F) -> LoadReport
    where
        F: Fn() + Sync,
    {
        let results: Vec<Result<Document, (PathBuf, CorpusError)>> = paths
            .into_par_iter()
            .map(|path| {
                let result = Document::from_path(path.clone()).map_err(|err| (path, err));
                on_parsed();
                result
            })
            .collect();

        let mut documents = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(doc) => documents.push(doc),
                Err(failure) => failures.push(failure),
            }
        }

        LoadReport {
            index: Self::from_documents(documents),
            failures,
        }
    }

    /// Build the index and both derived views from a document collection.
    ///
    /// The corpus is rebuilt wholesale on every indexing pass; this is the
    /// only way views change.
    pub fn from_documents(mut documents: Vec<Document>) -> Self {
        documents.sort_by(date_desc_path_asc);

        let by_date: Vec<PathBuf> = documents.iter().map(|d| d.path.clone()).collect();

        // Walking in by_date order makes category member order equal the
        // date order, and first appearance fixes the category order itself.
        let mut by_category: Vec<(String, Vec<PathBuf>)> = Vec::new();
        for doc in &documents {
            for category in doc.categories() {
                match by_category.iter_mut().find(|(name, _)| *name == category) {
                    Some((_, members)) => members.push(doc.path.clone()),
                    None => by_category.push((category, vec![doc.path.clone()])),
                }
            }
        }

        let documents = documents.into_iter().map(|d| (d.path.clone(), d)).collect();

        Self {
            documents,
            by_date,
            by_category,
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Every document, newest first; ties broken by ascending path.
    pub fn all_documents_sorted(&self) -> Vec<&Document> {
        self.by_date
            .iter()
            .filter_map(|path| self.documents.get(path))
            .collect()
    }

    /// Documents whose `categories` contain `category`, newest first.
    ///
    /// Unknown categories yield an empty sequence, never an error.
    pub fn documents_by_category(&self, category: &str) -> Vec<&Document> {
        self.by_category
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, members)| {
                members
                    .iter()
                    .filter_map(|path| self.documents.get(path))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All category names in first-appearance (date) order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, path: &Path) -> Option<&Document> {
        self.documents.get(path)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Serializes as `{ "documents": [...], "categories": { name: [paths] } }`,
/// documents in `by_date` order, for consumption by an external renderer.
impl Serialize for CorpusIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Categories<'a>(&'a [(String, Vec<PathBuf>)]);

        impl Serialize for Categories<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, members) in self.0 {
                    map.serialize_entry(name, members)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("documents", &self.all_documents_sorted())?;
        map.serialize_entry("categories", &Categories(&self.by_category))?;
        map.end()
    }
}

/// Total order: date descending, then path ascending.
///
/// Documents without a date sort after all dated documents, path-ascending
/// among themselves, so the order stays deterministic.
fn date_desc_path_asc(a: &Document, b: &Document) -> Ordering {
    match (a.date(), b.date()) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| a.path.cmp(&b.path)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.path.cmp(&b.path),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn doc(path: &str, date: &str, categories: &[&str]) -> Document {
        let cats = categories.join(", ");
        let raw = format!("---\ndate: {date}\ncategories: [{cats}]\n---\nbody of {path}");
        Document::from_str(PathBuf::from(path), &raw).unwrap()
    }

    fn undated_doc(path: &str) -> Document {
        Document::from_str(PathBuf::from(path), "no front matter").unwrap()
    }

    #[test]
    fn test_sorted_newest_first() {
        // Spec scenario: 2020-02-01 before 2020-01-01
        let index = CorpusIndex::from_documents(vec![
            doc("_posts/jan.md", "2020-01-01", &[]),
            doc("_posts/feb.md", "2020-02-01", &[]),
        ]);

        let sorted = index.all_documents_sorted();
        assert_eq!(sorted[0].path, PathBuf::from("_posts/feb.md"));
        assert_eq!(sorted[1].path, PathBuf::from("_posts/jan.md"));
    }

    #[test]
    fn test_sorted_ties_break_by_path_ascending() {
        let index = CorpusIndex::from_documents(vec![
            doc("_posts/zeta.md", "2020-01-01 10:00", &[]),
            doc("_posts/alpha.md", "2020-01-01 10:00", &[]),
        ]);

        let sorted = index.all_documents_sorted();
        assert_eq!(sorted[0].path, PathBuf::from("_posts/alpha.md"));
        assert_eq!(sorted[1].path, PathBuf::from("_posts/zeta.md"));
    }

    #[test]
    fn test_sorted_is_total_order() {
        let index = CorpusIndex::from_documents(vec![
            doc("_posts/b.md", "2021-05-01", &[]),
            doc("_posts/a.md", "2021-05-01", &[]),
            doc("_posts/c.md", "2022-01-01", &[]),
            undated_doc("_posts/undated.md"),
        ]);

        let sorted = index.all_documents_sorted();
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ordered = match (a.date(), b.date()) {
                (Some(da), Some(db)) => da > db || (da == db && a.path <= b.path),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => a.path <= b.path,
            };
            assert!(ordered, "{:?} should sort before {:?}", a.path, b.path);
        }
        // Undated documents come last
        assert_eq!(sorted[3].path, PathBuf::from("_posts/undated.md"));
    }

    #[test]
    fn test_documents_by_category() {
        let index = CorpusIndex::from_documents(vec![
            doc("_posts/old.md", "2020-01-01", &["Ruby"]),
            doc("_posts/new.md", "2020-02-01", &["Ruby", "Rails"]),
        ]);

        let ruby = index.documents_by_category("Ruby");
        assert_eq!(ruby.len(), 2);
        // Date-descending within the category
        assert_eq!(ruby[0].path, PathBuf::from("_posts/new.md"));

        let rails = index.documents_by_category("Rails");
        assert_eq!(rails.len(), 1);
    }

    #[test]
    fn test_unknown_category_is_empty_not_error() {
        let index =
            CorpusIndex::from_documents(vec![doc("_posts/a.md", "2020-01-01", &["Ruby"])]);
        assert!(index.documents_by_category("Haskell").is_empty());
    }

    #[test]
    fn test_categories_first_appearance_order() {
        let index = CorpusIndex::from_documents(vec![
            doc("_posts/old.md", "2020-01-01", &["PostgreSQL"]),
            doc("_posts/new.md", "2020-03-01", &["Ruby", "Rails"]),
        ]);

        let cats: Vec<_> = index.categories().collect();
        assert_eq!(cats, vec!["Ruby", "Rails", "PostgreSQL"]);
    }

    #[test]
    fn test_get_len_empty() {
        let index = CorpusIndex::from_documents(vec![doc("_posts/a.md", "2020-01-01", &[])]);
        assert_eq!(index.len(), 1);
        assert!(!index.is_empty());
        assert!(index.get(Path::new("_posts/a.md")).is_some());
        assert!(index.get(Path::new("_posts/missing.md")).is_none());

        assert!(CorpusIndex::default().is_empty());
    }

    #[test]
    fn test_load_partial_failure() {
        // Spec scenario: nine well-formed files plus one malformed file
        // yield nine documents and exactly one recorded error.
        let dir = tempfile::tempdir().unwrap();
        for i in 0..9 {
            let path = dir.path().join(format!("2020-01-{:02}-post.md", i + 1));
            fs::write(
                &path,
                format!("---\ntitle: \"Post {i}\"\ndate: 2020-01-{:02}\n---\nbody\n", i + 1),
            )
            .unwrap();
        }
        let bad = dir.path().join("2020-02-01-broken.md");
        fs::write(&bad, "---\ntitle: \"Broken\"\nno closing delimiter\n").unwrap();

        let mut paths: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        paths.sort();

        let report = CorpusIndex::load(paths);
        assert_eq!(report.index.len(), 9);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].1,
            CorpusError::MalformedDocument(_)
        ));
        assert_eq!(report.failures[0].0, bad);
    }

    #[test]
    fn test_load_missing_file_recorded_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("2020-01-01-ok.md");
        fs::write(&good, "---\ndate: 2020-01-01\n---\nok\n").unwrap();
        let missing = dir.path().join("2020-01-02-gone.md");

        let report = CorpusIndex::load(vec![good, missing]);
        assert_eq!(report.index.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].1,
            CorpusError::UnreadableFile(..)
        ));
    }

    #[test]
    fn test_load_with_progress_callback() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            fs::write(
                dir.path().join(format!("p{i}.md")),
                "---\ndate: 2020-01-01\n---\n",
            )
            .unwrap();
        }
        let paths: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();

        let count = AtomicUsize::new(0);
        let report = CorpusIndex::load_with(paths, || {
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), 4);
        assert_eq!(report.index.len(), 4);
    }

    #[test]
    fn test_json_dump_shape() {
        let index = CorpusIndex::from_documents(vec![
            doc("_posts/old.md", "2020-01-01", &["Ruby"]),
            doc("_posts/new.md", "2020-02-01", &["Ruby"]),
        ]);

        let json = serde_json::to_value(&index).unwrap();
        let docs = json["documents"].as_array().unwrap();
        assert_eq!(docs.len(), 2);
        // by_date order in the dump
        assert_eq!(docs[0]["path"], "_posts/new.md");
        assert_eq!(
            json["categories"]["Ruby"],
            serde_json::json!(["_posts/new.md", "_posts/old.md"])
        );
    }
}
