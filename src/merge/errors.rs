use thiserror::Error;

use crate::document::FieldPathError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("no priority rules configured")]
    NoPriorityRulesConfigured,
}

/// Per-path problem that was skipped during a merge.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeWarning {
    #[error("cannot read source path {path}: {source}")]
    PathRead {
        path: String,
        #[source]
        source: FieldPathError,
    },

    #[error("cannot write destination path {path}: {source}")]
    PathWrite {
        path: String,
        #[source]
        source: FieldPathError,
    },
}
