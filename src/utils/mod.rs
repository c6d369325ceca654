//! Utility modules for the corpus indexer.

pub mod date;
pub mod slug;
