use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision a rule hands out when it matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    Allow,
    Deny,
}

impl PolicyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyMode::Allow => "allow",
            PolicyMode::Deny => "deny",
        }
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of inbound API operation being authorized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Read,
    Vread,
    Search,
    History,
    Create,
    Update,
    Patch,
    Delete,
    Transaction,
    Batch,
    Metadata,
    ExtendedOperation,
}

impl OperationKind {
    pub const ALL: &'static [OperationKind] = &[
        OperationKind::Read,
        OperationKind::Vread,
        OperationKind::Search,
        OperationKind::History,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Patch,
        OperationKind::Delete,
        OperationKind::Transaction,
        OperationKind::Batch,
        OperationKind::Metadata,
        OperationKind::ExtendedOperation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Read => "read",
            OperationKind::Vread => "vread",
            OperationKind::Search => "search",
            OperationKind::History => "history",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Patch => "patch",
            OperationKind::Delete => "delete",
            OperationKind::Transaction => "transaction",
            OperationKind::Batch => "batch",
            OperationKind::Metadata => "metadata",
            OperationKind::ExtendedOperation => "extended_operation",
        }
    }

    /// Parse a snake_case token as written on the command line or in reports.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == token)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method of a single entry inside a batch or transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl RequestMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Head => "HEAD",
            RequestMethod::Options => "OPTIONS",
        }
    }

    /// Case-insensitive parse; unknown methods yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(RequestMethod::Get),
            "POST" => Some(RequestMethod::Post),
            "PUT" => Some(RequestMethod::Put),
            "DELETE" => Some(RequestMethod::Delete),
            "PATCH" => Some(RequestMethod::Patch),
            "HEAD" => Some(RequestMethod::Head),
            "OPTIONS" => Some(RequestMethod::Options),
            _ => None,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared kind of a composite document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    Transaction,
    Batch,
    Other,
}
