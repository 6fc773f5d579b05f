//! The `authorize` use case: resolve the rule chain and decide one request.

use anyhow::Context;
use authguard_domain::RequestDetails;
use authguard_settings::{Overrides, ResolvedConfig};
use authguard_types::{
    ids, DecisionReport, DecisionStatus, OperationKind, ToolMeta, SCHEMA_DECISION_V1,
};
use serde_json::Value;
use time::OffsetDateTime;

use crate::document::JsonOracle;

/// Input for the authorize use case.
#[derive(Clone, Debug)]
pub struct AuthorizeInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    pub operation: OperationKind,
    /// Resource submitted by the caller.
    pub input: Option<&'a Value>,
    /// Resource about to be returned.
    pub output: Option<&'a Value>,
    pub request_id: Option<&'a str>,
}

/// Output from the authorize use case.
#[derive(Clone, Debug)]
pub struct AuthorizeOutput {
    pub report: DecisionReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the authorize use case: parse config, resolve the chain, evaluate, produce a report.
///
/// A malformed request is not an error here: it produces a `rejected` report.
pub fn run_authorize(input: AuthorizeInput<'_>) -> anyhow::Result<AuthorizeOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        authguard_settings::AuthguardConfigV1::default()
    } else {
        authguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = authguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let oracle = JsonOracle;
    let mut request = RequestDetails::new(&oracle);
    if let Some(request_id) = input.request_id {
        request = request.with_request_id(request_id);
    }

    let (status, rule, reason, message) =
        match resolved
            .chain
            .authorize(input.operation, &request, input.input, input.output)
        {
            Ok(auth) => match auth.verdict {
                Some(verdict) => (
                    DecisionStatus::from(auth.decision),
                    Some(verdict.rule().name().to_string()),
                    ids::REASON_RULE_MATCHED.to_string(),
                    None,
                ),
                None => (
                    DecisionStatus::from(auth.decision),
                    None,
                    ids::REASON_DEFAULT_POLICY.to_string(),
                    None,
                ),
            },
            Err(err) => (
                DecisionStatus::Rejected,
                None,
                err.code().to_string(),
                Some(err.to_string()),
            ),
        };

    tracing::info!(
        operation = input.operation.as_str(),
        status = status.as_str(),
        rule = rule.as_deref().unwrap_or("-"),
        reason = reason.as_str(),
        "authorization decided"
    );

    let report = DecisionReport {
        schema: SCHEMA_DECISION_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        profile: resolved.profile.clone(),
        request_id: input.request_id.map(str::to_string),
        operation: Some(input.operation),
        status,
        rule,
        reason,
        message,
    };

    Ok(AuthorizeOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map decision status to exit code: 0 = allow, 2 = deny or rejected.
pub fn decision_exit_code(status: DecisionStatus) -> i32 {
    match status {
        DecisionStatus::Allow => 0,
        DecisionStatus::Deny => 2,
        DecisionStatus::Rejected => 2,
    }
}

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "authguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONFIG: &str = r#"
[[rules]]
name = "patient 123 reads own data"
mode = "allow"
op = "read"
compartment = { name = "Patient", owners = ["Patient/123"] }

[[rules]]
name = "writes"
mode = "allow"
op = "write"
resources = ["Patient", "Observation"]

[[rules]]
name = "transactions"
mode = "allow"
op = "transaction"
"#;

    fn authorize(
        operation: OperationKind,
        input: Option<&Value>,
        output: Option<&Value>,
    ) -> DecisionReport {
        run_authorize(AuthorizeInput {
            config_text: CONFIG,
            overrides: Overrides::default(),
            operation,
            input,
            output,
            request_id: Some("req-7"),
        })
        .expect("run_authorize")
        .report
    }

    #[test]
    fn empty_config_uses_strict_defaults() {
        let output = run_authorize(AuthorizeInput {
            config_text: "",
            overrides: Overrides::default(),
            operation: OperationKind::Metadata,
            input: None,
            output: None,
            request_id: None,
        })
        .expect("run_authorize");
        assert_eq!(output.resolved_config.profile, "strict");
        assert_eq!(output.report.status, DecisionStatus::Deny);
        assert_eq!(output.report.reason, ids::REASON_DEFAULT_POLICY);
        assert_eq!(output.report.rule, None);
    }

    #[test]
    fn matching_rule_is_reported() {
        let observation = json!({
            "resourceType": "Observation",
            "subject": {"reference": "Patient/123"}
        });
        let report = authorize(OperationKind::Read, None, Some(&observation));
        assert_eq!(report.status, DecisionStatus::Allow);
        assert_eq!(report.rule.as_deref(), Some("patient 123 reads own data"));
        assert_eq!(report.reason, ids::REASON_RULE_MATCHED);
        assert_eq!(report.request_id.as_deref(), Some("req-7"));
    }

    #[test]
    fn transaction_entries_go_through_the_chain() {
        let allowed = json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [
                {"resource": {"resourceType": "Patient"}, "request": {"method": "POST"}},
                {"resource": {"resourceType": "Observation"}, "request": {"method": "PUT"}},
                {"resource": {"resourceType": "Encounter"}, "request": {"method": "GET"}}
            ]
        });
        let report = authorize(OperationKind::Transaction, Some(&allowed), None);
        assert_eq!(report.status, DecisionStatus::Allow);
        assert_eq!(report.rule.as_deref(), Some("writes"));

        let unknown = json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [
                {"resource": {"resourceType": "Encounter"}, "request": {"method": "POST"}}
            ]
        });
        let report = authorize(OperationKind::Transaction, Some(&unknown), None);
        assert_eq!(report.status, DecisionStatus::Deny);
        assert_eq!(report.reason, ids::REASON_DEFAULT_POLICY);
    }

    #[test]
    fn malformed_transaction_is_rejected() {
        let nested = json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [
                {"resource": {"resourceType": "Bundle", "type": "transaction"}, "request": {"method": "POST"}}
            ]
        });
        let report = authorize(OperationKind::Transaction, Some(&nested), None);
        assert_eq!(report.status, DecisionStatus::Rejected);
        assert_eq!(report.reason, ids::CODE_NESTED_COMPOSITE);
        assert!(report.message.as_deref().unwrap_or("").contains("Bundle"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let err = run_authorize(AuthorizeInput {
            config_text: "[[rules]]\nname = \"x\"\nmode = \"allow\"\nop = \"nope\"\n",
            overrides: Overrides::default(),
            operation: OperationKind::Read,
            input: None,
            output: None,
            request_id: None,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown op: nope"));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(decision_exit_code(DecisionStatus::Allow), 0);
        assert_eq!(decision_exit_code(DecisionStatus::Deny), 2);
        assert_eq!(decision_exit_code(DecisionStatus::Rejected), 2);
    }
}
