//! Slug derivation for post filenames.
//!
//! Posts are conventionally named `YYYY-MM-DD-some-title.markdown`. The date
//! prefix is documentation convention only (the authoritative date lives in
//! front matter), so the slug is everything after it, normalized to a
//! URL-safe form.

use deunicode::deunicode;
use regex::Regex;
use std::{path::Path, sync::OnceLock};

/// Matches the conventional `YYYY-MM-DD-` filename prefix.
static DATE_PREFIX: OnceLock<Regex> = OnceLock::new();

fn date_prefix() -> &'static Regex {
    // Explicit ASCII classes: the crate is built without Unicode tables
    DATE_PREFIX.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-").unwrap())
}

/// Derive a slug from a post file path.
///
/// Strips the directory, the extension, and the conventional date prefix,
/// then slugifies the remainder.
///
/// | Path | Slug |
/// |------|------|
/// | `_posts/2013-07-28-hello-world.markdown` | `hello-world` |
/// | `_posts/rails/2014-01-01-Rails_Tips.md` | `rails-tips` |
/// | `notes.md` | `notes` |
pub fn slug_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let trimmed = date_prefix().replace(&stem, "");
    slugify(&trimmed)
}

/// Normalize text to a lowercase ASCII slug.
///
/// Unicode is transliterated via `deunicode`; runs of non-alphanumeric
/// characters collapse into a single hyphen.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
