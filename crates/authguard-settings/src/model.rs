use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_CONFIG_V1: &str = "authguard.config.v1";

/// `authguard.toml` schema v1.
///
/// This is a *user-facing* config model: values stay strings here and are validated during
/// resolution, so error messages can name the offending rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuthguardConfigV1 {
    /// Optional schema string for tooling (`authguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset profile: `strict` (default), `capabilities`, or `open`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Decision when no rule has an opinion: `allow` or `deny`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_policy: Option<String>,

    /// Rules in evaluation order. The first rule with an opinion decides.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Name reported with every decision this rule makes.
    pub name: String,

    /// `allow` or `deny`.
    pub mode: String,

    /// `read`, `write`, `delete`, `batch`, `transaction`, `allow_all`, `deny_all`, `metadata`.
    pub op: String,

    /// Resource types the rule covers. Absent means all resources; an empty list is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,

    /// Restrict the rule to resources in the compartment of any listed owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment: Option<CompartmentConfig>,

    /// For `batch`/`transaction` rules: which composite kind to recognize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompartmentConfig {
    /// Compartment name, e.g. `Patient`.
    pub name: String,

    /// Owner references, e.g. `Patient/123`.
    #[serde(default)]
    pub owners: Vec<String>,
}
