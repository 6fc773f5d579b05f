//! Use case orchestration for authguard.
//!
//! This crate provides the application layer: use cases that coordinate settings, the domain
//! engine, and the JSON document model. It is intentionally thin and delegates heavy lifting
//! to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod authorize;
mod document;
mod explain;
mod report;

pub use authorize::{decision_exit_code, run_authorize, AuthorizeInput, AuthorizeOutput};
pub use document::JsonOracle;
pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use report::{parse_report_json, runtime_error_report, serialize_report};
