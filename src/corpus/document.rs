//! A single post: path, slug, front matter, body.

use crate::{
    corpus::{
        error::CorpusError,
        front_matter::{self, FrontMatter},
    },
    utils::{date::DateTime, slug::slug_from_path},
};
use serde::Serialize;
use std::{fs, path::PathBuf};

/// One Markdown post, immutable once read.
///
/// The corpus is rebuilt wholesale on each indexing pass; documents are
/// never mutated in place.
///
/// | Field | Example |
/// |-------|---------|
/// | `path` | `_posts/2013-07-28-hello-world.markdown` |
/// | `slug` | `hello-world` |
/// | `front_matter` | `layout`, `title`, `date`, `comments`, `categories` |
/// | `body` | raw Markdown after the closing `---` |
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub path: PathBuf,
    pub slug: String,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Document {
    /// Read and parse one post file.
    ///
    /// # Errors
    ///
    /// - `UnreadableFile` when the file cannot be opened or read
    /// - `MalformedDocument` when the front-matter block is unterminated;
    ///   the file is rejected rather than reinterpreted as body (see the
    ///   policy note in DESIGN.md)
    pub fn from_path(path: PathBuf) -> Result<Self, CorpusError> {
        let raw = fs::read_to_string(&path)
            .map_err(|err| CorpusError::UnreadableFile(path.clone(), err))?;
        Self::from_str(path, &raw)
    }

    /// Parse a post from already-read contents.
    pub fn from_str(path: PathBuf, raw: &str) -> Result<Self, CorpusError> {
        let (front_matter, body) = front_matter::parse(raw)
            .map_err(|_| CorpusError::MalformedDocument(path.clone()))?;

        let slug = slug_from_path(&path);

        Ok(Self {
            path,
            slug,
            front_matter,
            body: body.to_owned(),
        })
    }

    /// The authoritative post date, from front matter.
    ///
    /// The date in the filename is naming convention only and is never
    /// consulted for ordering.
    pub fn date(&self) -> Option<DateTime> {
        self.front_matter.date()
    }

    pub fn title(&self) -> Option<&str> {
        self.front_matter.title()
    }

    pub fn categories(&self) -> Vec<String> {
        self.front_matter.categories()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, raw: &str) -> Document {
        Document::from_str(PathBuf::from(path), raw).unwrap()
    }

    #[test]
    fn test_from_str_hello_scenario() {
        let raw = "---\n\
                   layout: post\n\
                   title: \"Hello\"\n\
                   date: 2020-01-01 10:00\n\
                   comments: true\n\
                   categories: [A, B]\n\
                   ---\n\
                   Body text.";
        let doc = doc("_posts/2020-01-01-hello.markdown", raw);

        assert_eq!(doc.slug, "hello");
        assert_eq!(doc.title(), Some("Hello"));
        assert_eq!(doc.date(), Some(DateTime::new(2020, 1, 1, 10, 0, 0)));
        assert_eq!(doc.front_matter.comments(), Some(true));
        assert_eq!(doc.categories(), vec!["A".to_owned(), "B".to_owned()]);
        assert_eq!(doc.body, "Body text.");
    }

    #[test]
    fn test_from_str_without_front_matter() {
        let raw = "Plain file, no metadata.";
        let doc = doc("_posts/note.md", raw);
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, raw);
        assert_eq!(doc.date(), None);
    }

    #[test]
    fn test_from_str_unterminated_is_malformed() {
        let raw = "---\nlayout: post\nno closing delimiter";
        let err = Document::from_str(PathBuf::from("_posts/bad.md"), raw).unwrap_err();
        assert!(matches!(err, CorpusError::MalformedDocument(p) if p.ends_with("bad.md")));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Document::from_path(PathBuf::from("/nonexistent/2020-01-01-x.md")).unwrap_err();
        assert!(matches!(err, CorpusError::UnreadableFile(..)));
    }

    #[test]
    fn test_from_path_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2021-03-14-pi-day.md");
        fs::write(&path, "---\ntitle: \"Pi\"\ndate: 2021-03-14\n---\n3.14159\n").unwrap();

        let doc = Document::from_path(path).unwrap();
        assert_eq!(doc.slug, "pi-day");
        assert_eq!(doc.title(), Some("Pi"));
        assert_eq!(doc.body, "3.14159\n");
    }
}
