//! Stable identifiers for rule operations and decision reason codes.
//!
//! Rule-op tokens are what users write in `authguard.toml`. Reason codes are short
//! snake_case discriminators carried by decision reports.

// Rule operations
pub const OP_READ: &str = "read";
pub const OP_WRITE: &str = "write";
pub const OP_DELETE: &str = "delete";
pub const OP_BATCH: &str = "batch";
pub const OP_TRANSACTION: &str = "transaction";
pub const OP_ALLOW_ALL: &str = "allow_all";
pub const OP_DENY_ALL: &str = "deny_all";
pub const OP_METADATA: &str = "metadata";

// Reason codes: decisions
pub const REASON_RULE_MATCHED: &str = "rule_matched";
pub const REASON_DEFAULT_POLICY: &str = "default_policy";

// Reason codes: malformed composite requests
pub const CODE_UNSUPPORTED_ENTRY_METHOD: &str = "unsupported_entry_method";
pub const CODE_NESTED_COMPOSITE: &str = "nested_composite";
pub const CODE_MISSING_ENTRY_RESOURCE: &str = "missing_entry_resource";

// Tool-level
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";

/// Resource types that carry further operations inside them. These are never unpacked
/// when they appear as an entry of a batch or transaction.
pub const COMPOSITE_RESOURCE_TYPES: &[&str] = &["Bundle", "Parameters"];

pub fn is_composite_resource_type(resource_type: &str) -> bool {
    COMPOSITE_RESOURCE_TYPES.contains(&resource_type)
}
