//! Report serialization and runtime-error reports.

use anyhow::Context;
use authguard_types::{ids, DecisionReport, DecisionStatus, SCHEMA_DECISION_V1};
use time::OffsetDateTime;

use crate::authorize::tool_meta;

pub fn serialize_report(report: &DecisionReport) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

pub fn parse_report_json(text: &str) -> anyhow::Result<DecisionReport> {
    let report: DecisionReport = serde_json::from_str(text).context("parse report json")?;
    if report.schema != SCHEMA_DECISION_V1 {
        anyhow::bail!(
            "unsupported report schema: {} (expected {SCHEMA_DECISION_V1})",
            report.schema
        );
    }
    Ok(report)
}

/// Report emitted when the request could not be evaluated at all (bad config, unreadable
/// input). Fails closed: the status is `rejected`.
pub fn runtime_error_report(message: &str) -> DecisionReport {
    let now = OffsetDateTime::now_utc();
    DecisionReport {
        schema: SCHEMA_DECISION_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        profile: "unknown".to_string(),
        request_id: None,
        operation: None,
        status: DecisionStatus::Rejected,
        rule: None,
        reason: ids::CODE_RUNTIME_ERROR.to_string(),
        message: Some(message.to_string()),
    }
}
