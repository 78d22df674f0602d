//! Composition-function step: decodes the input, runs either the member
//! resolver or the priority merge, and reports the outcome as conditions and
//! results on the response.

pub mod input;
pub mod request;
pub mod runner;

pub use input::{FunctionType, GroupList, Input};
pub use request::{
    Condition, ConditionStatus, RequestMeta, Resource, ResultMessage, RunFunctionRequest, RunFunctionResponse,
    Severity, State, Target,
};
pub use runner::Function;
