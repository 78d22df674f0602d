use serde::{Deserialize, Serialize};

use crate::merge::TransformRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum FunctionType {
    /// Resolve group names into member identifiers.
    FetchUser,
    /// Priority-merge identifier lists across paths.
    DedupeUsers,
}

impl FunctionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionType::FetchUser => "FetchUser",
            FunctionType::DedupeUsers => "DedupeUsers",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupList {
    #[serde(default)]
    pub from_composite_field: String,
}

/// Function input as embedded in the composition pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    pub function_type: FunctionType,
    #[serde(default)]
    pub group_list: GroupList,
    #[serde(default)]
    pub output_field: String,
    /// Lowest priority first.
    #[serde(default)]
    pub groups_priority: Vec<TransformRule>,
}
