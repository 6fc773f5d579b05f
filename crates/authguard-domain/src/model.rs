use authguard_types::{ids, BundleKind, OwnerId};
use std::collections::BTreeSet;

/// Which branch of the evaluation dispatch a rule belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleOp {
    Read,
    Write,
    Delete,
    Batch,
    Transaction,
    AllowAll,
    DenyAll,
    Metadata,
}

impl RuleOp {
    pub const ALL: &'static [RuleOp] = &[
        RuleOp::Read,
        RuleOp::Write,
        RuleOp::Delete,
        RuleOp::Batch,
        RuleOp::Transaction,
        RuleOp::AllowAll,
        RuleOp::DenyAll,
        RuleOp::Metadata,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleOp::Read => ids::OP_READ,
            RuleOp::Write => ids::OP_WRITE,
            RuleOp::Delete => ids::OP_DELETE,
            RuleOp::Batch => ids::OP_BATCH,
            RuleOp::Transaction => ids::OP_TRANSACTION,
            RuleOp::AllowAll => ids::OP_ALLOW_ALL,
            RuleOp::DenyAll => ids::OP_DENY_ALL,
            RuleOp::Metadata => ids::OP_METADATA,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == token)
    }

    pub fn is_composite(self) -> bool {
        matches!(self, RuleOp::Batch | RuleOp::Transaction)
    }

    /// Whether the type and classifier filters take part in evaluation.
    pub fn is_filtered(self) -> bool {
        matches!(self, RuleOp::Read | RuleOp::Write | RuleOp::Delete)
    }
}

/// Resource-type filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppliesTo {
    AllResources,
    /// Never empty once built through `RuleBuilder`.
    Types(BTreeSet<String>),
}

impl AppliesTo {
    pub fn matches(&self, resource_type: &str) -> bool {
        match self {
            AppliesTo::AllResources => true,
            AppliesTo::Types(types) => types.contains(resource_type),
        }
    }
}

/// Ownership filter applied after the type filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classifier {
    AnyId,
    /// Compartment name and owners are never empty once built through `RuleBuilder`.
    InCompartment {
        compartment: String,
        owners: Vec<OwnerId>,
    },
}

/// Composite kind a batch/transaction rule recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionAppliesTo {
    Batch,
    Transaction,
}

impl TransactionAppliesTo {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionAppliesTo::Batch => ids::OP_BATCH,
            TransactionAppliesTo::Transaction => ids::OP_TRANSACTION,
        }
    }

    pub fn matches(self, kind: BundleKind) -> bool {
        matches!(
            (self, kind),
            (TransactionAppliesTo::Batch, BundleKind::Batch)
                | (TransactionAppliesTo::Transaction, BundleKind::Transaction)
        )
    }
}
