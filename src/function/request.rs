use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RequestMeta {
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Resource {
    #[serde(default)]
    pub resource: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct State {
    #[serde(default)]
    pub composite: Resource,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RunFunctionRequest {
    #[serde(default)]
    pub meta: RequestMeta,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub observed: State,
    #[serde(default)]
    pub desired: State,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResponseMeta {
    pub tag: String,
    /// Seconds the pipeline may cache this response.
    pub ttl: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Severity {
    Fatal,
    Warning,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResultMessage {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ConditionStatus {
    True,
    False,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Target {
    Composite,
    CompositeAndClaim,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ConditionStatus,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub target: Target,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RunFunctionResponse {
    pub meta: ResponseMeta,
    pub desired: State,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub results: Vec<ResultMessage>,
}

pub const FUNCTION_SUCCESS: &str = "FunctionSuccess";

impl RunFunctionResponse {
    /// Response carrying the request's tag and desired state forward.
    pub fn to(req: &RunFunctionRequest, ttl_seconds: u64) -> Self {
        Self {
            meta: ResponseMeta {
                tag: req.meta.tag.clone(),
                ttl: ttl_seconds,
            },
            desired: req.desired.clone(),
            conditions: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn fatal(&mut self, message: impl Into<String>) {
        self.push_result(Severity::Fatal, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push_result(Severity::Warning, message);
    }

    fn push_result(&mut self, severity: Severity, message: impl Into<String>) {
        self.results.push(ResultMessage {
            severity,
            message: message.into(),
        });
    }

    pub fn condition(
        &mut self,
        status: ConditionStatus,
        reason: &str,
        message: Option<String>,
        target: Target,
    ) {
        self.conditions.push(Condition {
            kind: FUNCTION_SUCCESS.to_owned(),
            status,
            reason: reason.to_owned(),
            message,
            target,
        });
    }

    pub fn is_fatal(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Fatal)
    }
}
