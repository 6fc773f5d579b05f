use crate::{OperationKind, PolicyMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for authguard decision reports.
pub const SCHEMA_DECISION_V1: &str = "authguard.decision.v1";

/// Final status of one authorization call.
///
/// `Rejected` is distinct from `Deny`: the request could not be evaluated at all
/// (malformed composite request) and must not be partially authorized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Allow,
    Deny,
    Rejected,
}

impl DecisionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Allow => "allow",
            DecisionStatus::Deny => "deny",
            DecisionStatus::Rejected => "rejected",
        }
    }
}

impl From<PolicyMode> for DecisionStatus {
    fn from(mode: PolicyMode) -> Self {
        match mode {
            PolicyMode::Allow => DecisionStatus::Allow,
            PolicyMode::Deny => DecisionStatus::Deny,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionReport {
    pub schema: String,
    pub tool: ToolMeta,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,

    /// Profile the rule chain was resolved from.
    pub profile: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Absent only for runtime-error reports emitted before the request was read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationKind>,

    pub status: DecisionStatus,

    /// Name of the rule that produced the decision. `None` when the default policy applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    /// Stable reason code (see `ids`).
    pub reason: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
