//! Explain registry for rule operations and reason codes.
//!
//! Maps rule-op tokens and reason codes to human-readable explanations with a
//! configuration example.

use crate::ids;

/// Explanation entry for a rule operation or reason code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the op/code.
    pub title: &'static str,
    /// What it matches and when it abstains.
    pub description: &'static str,
    /// `authguard.toml` snippet showing typical use.
    pub example: &'static str,
}

/// Look up an explanation by rule-op token or reason code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Rule ops
        ids::OP_READ => Some(explain_read()),
        ids::OP_WRITE => Some(explain_write()),
        ids::OP_DELETE => Some(explain_delete()),
        ids::OP_BATCH => Some(explain_batch()),
        ids::OP_TRANSACTION => Some(explain_transaction()),
        ids::OP_ALLOW_ALL => Some(explain_allow_all()),
        ids::OP_DENY_ALL => Some(explain_deny_all()),
        ids::OP_METADATA => Some(explain_metadata()),

        // Codes
        ids::CODE_UNSUPPORTED_ENTRY_METHOD => Some(explain_unsupported_entry_method()),
        ids::CODE_NESTED_COMPOSITE => Some(explain_nested_composite()),
        ids::CODE_MISSING_ENTRY_RESOURCE => Some(explain_missing_entry_resource()),

        _ => None,
    }
}

/// List all known rule-op tokens.
pub fn all_rule_ops() -> &'static [&'static str] {
    &[
        ids::OP_READ,
        ids::OP_WRITE,
        ids::OP_DELETE,
        ids::OP_BATCH,
        ids::OP_TRANSACTION,
        ids::OP_ALLOW_ALL,
        ids::OP_DENY_ALL,
        ids::OP_METADATA,
    ]
}

/// List all known reason codes that reject a request.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_UNSUPPORTED_ENTRY_METHOD,
        ids::CODE_NESTED_COMPOSITE,
        ids::CODE_MISSING_ENTRY_RESOURCE,
    ]
}

// --- Rule-op explanations ---

fn explain_read() -> Explanation {
    Explanation {
        title: "Read",
        description: "\
Matches resources being returned to the caller. The rule inspects the output
resource of an operation, so it abstains whenever there is nothing to return.

If `resources` is set, only those resource types match. If `compartment` is set,
the resource must belong to the compartment of at least one listed owner.",
        example: r#"[[rules]]
name = "patient reads own record"
mode = "allow"
op = "read"
resources = ["Patient", "Observation"]
compartment = { name = "Patient", owners = ["Patient/123"] }"#,
    }
}

fn explain_write() -> Explanation {
    Explanation {
        title: "Write",
        description: "\
Matches resources submitted by the caller (create, update). The rule inspects the
input resource, so it abstains when the request carries no body.

Type and compartment filters apply exactly as for `read`.",
        example: r#"[[rules]]
name = "clinician writes observations"
mode = "allow"
op = "write"
resources = ["Observation"]"#,
    }
}

fn explain_delete() -> Explanation {
    Explanation {
        title: "Delete",
        description: "\
Matches delete operations only. A delete by id carries no resource to inspect, so
the rule decides immediately without applying type or compartment filters. When
the deleted resource is available it is filtered like `write`.",
        example: r#"[[rules]]
name = "no deletes"
mode = "deny"
op = "delete""#,
    }
}

fn explain_batch() -> Explanation {
    Explanation {
        title: "Batch",
        description: "\
Matches composite requests whose declared kind is `batch`.

A deny rule rejects the whole batch without looking inside it. An allow rule
evaluates every POST/PUT entry against the full rule chain (GET entries are
skipped) and returns the most restrictive result: any deny wins. When only a
response bundle is present, each returned resource is evaluated as a read.",
        example: r#"[[rules]]
name = "allow batches"
mode = "allow"
op = "batch""#,
    }
}

fn explain_transaction() -> Explanation {
    Explanation {
        title: "Transaction",
        description: "\
Matches composite requests whose declared kind is `transaction`. Entries are
handled exactly as for `batch`. Use `applies_to` to make a transaction rule
recognize batches instead.",
        example: r#"[[rules]]
name = "allow transactions"
mode = "allow"
op = "transaction"
applies_to = "transaction""#,
    }
}

fn explain_allow_all() -> Explanation {
    Explanation {
        title: "Allow All",
        description: "\
Always allows, regardless of operation or resources. Usually placed last in the
chain to open up everything not denied earlier. `mode` must be `allow`.",
        example: r#"[[rules]]
name = "everything else"
mode = "allow"
op = "allow_all""#,
    }
}

fn explain_deny_all() -> Explanation {
    Explanation {
        title: "Deny All",
        description: "\
Always denies, regardless of operation or resources. Usually placed last in the
chain to close everything not allowed earlier. `mode` must be `deny`.",
        example: r#"[[rules]]
name = "everything else"
mode = "deny"
op = "deny_all""#,
    }
}

fn explain_metadata() -> Explanation {
    Explanation {
        title: "Metadata",
        description: "\
Matches capability/metadata requests only and abstains on every other operation.",
        example: r#"[[rules]]
name = "public capability statement"
mode = "allow"
op = "metadata""#,
    }
}

// --- Code explanations ---

fn explain_unsupported_entry_method() -> Explanation {
    Explanation {
        title: "Unsupported Entry Method",
        description: "\
A batch or transaction contained an entry whose method is neither GET, POST nor
PUT. The whole request is rejected rather than letting an unrecognized method
slip past authorization.",
        example: r#"# Split DELETE/PATCH entries into separate requests."#,
    }
}

fn explain_nested_composite() -> Explanation {
    Explanation {
        title: "Nested Composite",
        description: "\
A batch or transaction contained an entry that is itself a Bundle or Parameters
document. Nested composites are never unpacked; the request is rejected.",
        example: r#"# Submit nested bundles as their own requests."#,
    }
}

fn explain_missing_entry_resource() -> Explanation {
    Explanation {
        title: "Missing Entry Resource",
        description: "\
A POST or PUT entry inside a batch or transaction carried no resource, so there was
nothing to authorize. The request is rejected.",
        example: r#"# Every POST/PUT entry needs a `resource`."#,
    }
}
