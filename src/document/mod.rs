//! Path-addressed access to JSON documents.
//!
//! Paths use the composition field-path syntax: `spec.users`, `items[0]`,
//! `metadata.annotations[example.org/team]`.

pub mod fieldpath;
pub mod paved;

pub use fieldpath::{FieldPathError, Segment};
pub use paved::Paved;

/// Reads a list of strings at a path.
pub trait DocumentReader {
    fn get_string_list(&self, path: &str) -> Result<Vec<String>, FieldPathError>;
}

/// Writes a list of strings at a path, replacing whatever was there.
pub trait DocumentWriter {
    fn merge_string_list(&mut self, path: &str, values: Vec<String>) -> Result<(), FieldPathError>;
}
