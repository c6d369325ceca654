//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        "_posts".into()
    }

    pub fn extensions() -> Vec<String> {
        vec!["md".into(), "markdown".into()]
    }
}

// ============================================================================
// [index] Section Defaults
// ============================================================================

pub mod index {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "index.json".into()
    }
}
