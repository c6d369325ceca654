//! Front-matter block parsing.
//!
//! Every post may begin with a metadata block delimited by `---` lines:
//!
//! ```text
//! ---
//! layout: post
//! title: "Some Title"
//! date: 2013-07-28 10:00
//! comments: true
//! categories: [Ruby, Rails]
//! ---
//! <body markdown>
//! ```
//!
//! The parser splits a file into `(FrontMatter, body)`:
//! - no leading `---`: empty front matter, the whole input is the body
//! - leading `---`: `key: value` lines up to the closing `---`, the rest
//!   is the body, verbatim
//! - an opening `---` with no closing `---` is an explicit error, never
//!   silently swallowed
//!
//! # Value Coercion
//!
//! | Source | Value |
//! |--------|-------|
//! | `"quoted"` / `'quoted'` | `Str` (quotes stripped, coercion suppressed) |
//! | `[a, b, c]` | `List` of trimmed strings |
//! | `true` / `false` | `Bool` |
//! | `YYYY-MM-DD[ HH:MM[:SS]]` | `Date` |
//! | anything else | `Str` |

use crate::utils::date::DateTime;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::fmt::Write as _;
use thiserror::Error;

/// Opening `---` present but the closing delimiter never appears.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("front matter block is unterminated")]
pub struct Unterminated;

/// Front-matter block delimiter line.
const DELIMITER: &str = "---";

// ============================================================================
// Value
// ============================================================================

/// A single front-matter value.
///
/// Tagged variant rather than an untyped map, so consumers get type safety
/// for the modeled fields (`layout`, `title`, `date`, `comments`,
/// `categories`) without a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Date(DateTime),
    List(Vec<String>),
    Str(String),
}

impl Value {
    /// Coerce a raw scalar into a typed value.
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();

        // `[...]` is a list of comma-separated trimmed strings
        if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let items = split_list_items(inner)
                .into_iter()
                .map(|item| strip_quotes(item.trim()).to_owned())
                .filter(|item| !item.is_empty())
                .collect();
            return Self::List(items);
        }

        // Quoting suppresses all further coercion
        if raw.len() >= 2
            && ((raw.starts_with('"') && raw.ends_with('"'))
                || (raw.starts_with('\'') && raw.ends_with('\'')))
        {
            return Self::Str(strip_quotes(raw).to_owned());
        }

        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => DateTime::parse(raw).map_or_else(|| Self::Str(raw.to_owned()), Self::Date),
        }
    }

    /// Render the value back to its front-matter source form.
    ///
    /// Strings and list items are always quoted so `coerce` maps them back
    /// unchanged regardless of their content.
    pub fn to_source(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Date(dt) => dt.to_string(),
            Self::List(items) => {
                let mut out = String::from("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('"');
                    out.push_str(item);
                    out.push('"');
                }
                out.push(']');
                out
            }
            Self::Str(s) => format!("\"{s}\""),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_date(&self) -> Option<DateTime> {
        match self {
            Self::Date(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// Split list contents on commas, ignoring commas inside quoted items.
fn split_list_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in inner.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ',' => items.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            },
        }
    }
    items.push(current);
    items
}

/// Strip one layer of matching single or double quotes.
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' && bytes[s.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'')
        {
            return &s[1..s.len() - 1];
        }
    }
    s
}

// ============================================================================
// FrontMatter
// ============================================================================

/// Parsed front-matter mapping, preserving key insertion order.
///
/// Never null: a document without a front-matter block gets an empty
/// mapping. Unknown keys are kept as-is; missing keys are not errors (the
/// typed accessors return `None`/empty instead).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    entries: Vec<(String, Value)>,
}

impl FrontMatter {
    /// Look up a value by key (first occurrence wins).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ------------------------------------------------------------------------
    // Typed accessors for the modeled keys
    // ------------------------------------------------------------------------

    pub fn layout(&self) -> Option<&str> {
        self.get("layout").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn date(&self) -> Option<DateTime> {
        self.get("date").and_then(Value::as_date)
    }

    pub fn comments(&self) -> Option<bool> {
        self.get("comments").and_then(Value::as_bool)
    }

    /// Categories list; a bare string category counts as a one-item list,
    /// and a missing key is an empty list, never an error.
    pub fn categories(&self) -> Vec<String> {
        match self.get("categories") {
            Some(Value::List(items)) => items.clone(),
            Some(Value::Str(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Render the mapping back to a `---`-delimited block.
    ///
    /// An empty mapping renders to an empty string (no delimiters), so
    /// `parse(serialize(fm) + body)` round-trips for every state.
    pub fn to_block(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let mut out = String::from(DELIMITER);
        out.push('\n');
        for (key, value) in &self.entries {
            let _ = writeln!(out, "{key}: {}", value.to_source());
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

impl FromIterator<(String, Value)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Serializes as a JSON object, keys in insertion order.
impl Serialize for FrontMatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Split a file into its front-matter mapping and body.
///
/// The body is returned verbatim (no trimming). Inside the block, blank
/// lines and lines without a `:` are skipped rather than rejected, matching
/// the forgiving nature of static-site generators.
///
/// # Errors
///
/// `Unterminated` when the opening `---` has no closing `---`.
pub fn parse(input: &str) -> Result<(FrontMatter, &str), Unterminated> {
    let Some(rest) = strip_delimiter_line(input) else {
        return Ok((FrontMatter::default(), input));
    };

    let mut entries = Vec::new();
    let mut offset = input.len() - rest.len();

    for line in rest.split_inclusive('\n') {
        offset += line.len();
        let line = line.trim_end_matches(['\n', '\r']);

        if line == DELIMITER {
            return Ok((FrontMatter { entries }, &input[offset..]));
        }

        if line.trim().is_empty() {
            continue;
        }

        if let Some((key, raw)) = line.split_once(':') {
            entries.push((key.trim().to_owned(), Value::coerce(raw)));
        }
    }

    Err(Unterminated)
}

/// If the input starts with a `---` line, return everything after it.
fn strip_delimiter_line(input: &str) -> Option<&str> {
    match input.find('\n') {
        Some(end) if input[..end].trim_end_matches('\r') == DELIMITER => Some(&input[end + 1..]),
        // A bare `---` with no newline still opens a block
        None if input.trim_end_matches('\r') == DELIMITER => Some(""),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
