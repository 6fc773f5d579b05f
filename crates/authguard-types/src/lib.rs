//! Stable DTOs and IDs used across the authguard workspace.
//!
//! This crate is intentionally boring:
//! - the operation/method/policy vocabulary shared by rules and requests
//! - stable string IDs and reason codes
//! - compartment owner references
//! - the emitted decision receipt
//! - explain registry for rule operations

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod operation;
pub mod owner;
pub mod receipt;

pub use explain::{lookup_explanation, Explanation};
pub use operation::{BundleKind, OperationKind, PolicyMode, RequestMethod};
pub use owner::OwnerId;
pub use receipt::{DecisionReport, DecisionStatus, ToolMeta, SCHEMA_DECISION_V1};
