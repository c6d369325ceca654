//! Corpus: documents, front matter, and the aggregate index.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `front_matter` | split one file into `(FrontMatter, body)` |
//! | `document` | one post: path, slug, metadata, body |
//! | `store` | candidate file discovery under the input directory |
//! | `index` | date- and category-ordered views over all documents |
//! | `error` | per-file vs. fatal error taxonomy |

pub mod document;
pub mod error;
pub mod front_matter;
pub mod index;
pub mod store;

pub use document::Document;
pub use error::CorpusError;
pub use front_matter::{FrontMatter, Value};
pub use index::{CorpusIndex, LoadReport};
