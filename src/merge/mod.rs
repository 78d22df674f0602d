//! Priority-based de-duplication of identifier lists across document paths.

pub mod engine;
pub mod errors;

pub use engine::{merge, merge_in_place, plan, MergeOutcome, MergeResult, TransformRule};
pub use errors::{MergeError, MergeWarning};
