use crate::model::{AppliesTo, Classifier, RuleOp, TransactionAppliesTo};
use authguard_types::{OwnerId, PolicyMode};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// An immutable, configured policy fragment.
///
/// `Rule` is a cheap handle: clones share the same configuration, so verdicts can carry
/// their source rule without copying it. Rules are built once through [`RuleBuilder`]
/// and never change afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Rule {
    inner: Arc<RuleDef>,
}

#[derive(Debug, PartialEq, Eq)]
struct RuleDef {
    name: String,
    op: RuleOp,
    mode: PolicyMode,
    applies_to: AppliesTo,
    classifier: Classifier,
    transaction_applies_to: TransactionAppliesTo,
}

impl Rule {
    pub fn builder(name: impl Into<String>) -> RuleBuilder {
        RuleBuilder::new(name)
    }

    pub fn allow_all(name: impl Into<String>) -> Rule {
        Rule::unfiltered(name.into(), RuleOp::AllowAll, PolicyMode::Allow)
    }

    pub fn deny_all(name: impl Into<String>) -> Rule {
        Rule::unfiltered(name.into(), RuleOp::DenyAll, PolicyMode::Deny)
    }

    pub fn metadata(name: impl Into<String>, mode: PolicyMode) -> Rule {
        Rule::unfiltered(name.into(), RuleOp::Metadata, mode)
    }

    fn unfiltered(name: String, op: RuleOp, mode: PolicyMode) -> Rule {
        Rule {
            inner: Arc::new(RuleDef {
                name,
                op,
                mode,
                applies_to: AppliesTo::AllResources,
                classifier: Classifier::AnyId,
                transaction_applies_to: TransactionAppliesTo::Transaction,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn op(&self) -> RuleOp {
        self.inner.op
    }

    pub fn mode(&self) -> PolicyMode {
        self.inner.mode
    }

    pub fn applies_to(&self) -> &AppliesTo {
        &self.inner.applies_to
    }

    pub fn classifier(&self) -> &Classifier {
        &self.inner.classifier
    }

    pub fn transaction_applies_to(&self) -> TransactionAppliesTo {
        self.inner.transaction_applies_to
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.inner.name)
            .field("op", &self.inner.op)
            .field("mode", &self.inner.mode)
            .field("applies_to", &self.inner.applies_to)
            .field("classifier", &self.inner.classifier)
            .field("transaction_applies_to", &self.inner.transaction_applies_to)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleConfigError {
    #[error("rule name must not be empty")]
    EmptyName,
    #[error("rule '{0}' has no mode (allow or deny)")]
    MissingMode(String),
    #[error("rule '{0}' has no operation")]
    MissingOp(String),
    #[error("rule '{0}' restricts resource types but lists none")]
    EmptyTypeSet(String),
    #[error("rule '{0}' lists an empty resource type")]
    BlankResourceType(String),
    #[error("rule '{0}' has a compartment classifier without a compartment name")]
    EmptyCompartmentName(String),
    #[error("rule '{0}' has a compartment classifier without owners")]
    EmptyOwnerSet(String),
    #[error("rule '{0}' lists an empty compartment owner")]
    BlankOwner(String),
    #[error("rule '{rule}' lists compartment owner '{owner}' without a resource type (expected e.g. Patient/123)")]
    UntypedOwner { rule: String, owner: String },
    #[error("rule '{0}' uses op {1} with a conflicting mode")]
    ModeConflictsWithOp(String, &'static str),
}

/// Collects rule fields and validates them once in [`RuleBuilder::build`].
#[derive(Clone, Debug)]
pub struct RuleBuilder {
    name: String,
    op: Option<RuleOp>,
    mode: Option<PolicyMode>,
    types: Option<BTreeSet<String>>,
    compartment: Option<(String, Vec<OwnerId>)>,
    transaction_applies_to: Option<TransactionAppliesTo>,
}

impl RuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: None,
            mode: None,
            types: None,
            compartment: None,
            transaction_applies_to: None,
        }
    }

    pub fn mode(mut self, mode: PolicyMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn allow(self) -> Self {
        self.mode(PolicyMode::Allow)
    }

    pub fn deny(self) -> Self {
        self.mode(PolicyMode::Deny)
    }

    pub fn op(mut self, op: RuleOp) -> Self {
        self.op = Some(op);
        self
    }

    /// Restrict the rule to the given resource types. Calling it again replaces the set.
    pub fn resources_of_type<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn in_compartment<I, O>(mut self, compartment: impl Into<String>, owners: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OwnerId>,
    {
        self.compartment = Some((
            compartment.into(),
            owners.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Override which composite kind a batch/transaction rule recognizes.
    /// Defaults to the kind named by the rule op.
    pub fn transaction_applies_to(mut self, kind: TransactionAppliesTo) -> Self {
        self.transaction_applies_to = Some(kind);
        self
    }

    pub fn build(self) -> Result<Rule, RuleConfigError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RuleConfigError::EmptyName);
        }
        let mode = self
            .mode
            .ok_or_else(|| RuleConfigError::MissingMode(name.clone()))?;
        let op = self
            .op
            .ok_or_else(|| RuleConfigError::MissingOp(name.clone()))?;

        // Unconditional ops carry their own decision; the mode must agree with it.
        let conflicting = match op {
            RuleOp::AllowAll => mode != PolicyMode::Allow,
            RuleOp::DenyAll => mode != PolicyMode::Deny,
            _ => false,
        };
        if conflicting {
            return Err(RuleConfigError::ModeConflictsWithOp(name, op.as_str()));
        }

        let applies_to = match self.types {
            None => AppliesTo::AllResources,
            Some(types) if types.is_empty() => {
                return Err(RuleConfigError::EmptyTypeSet(name));
            }
            Some(types) => {
                if types.iter().any(|t| t.trim().is_empty()) {
                    return Err(RuleConfigError::BlankResourceType(name));
                }
                AppliesTo::Types(types)
            }
        };

        let classifier = match self.compartment {
            None => Classifier::AnyId,
            Some((compartment, owners)) => {
                if compartment.trim().is_empty() {
                    return Err(RuleConfigError::EmptyCompartmentName(name));
                }
                if owners.is_empty() {
                    return Err(RuleConfigError::EmptyOwnerSet(name));
                }
                if owners.iter().any(OwnerId::is_empty) {
                    return Err(RuleConfigError::BlankOwner(name));
                }
                if let Some(owner) = owners.iter().find(|o| o.resource_type().is_none()) {
                    return Err(RuleConfigError::UntypedOwner {
                        rule: name,
                        owner: owner.to_string(),
                    });
                }
                Classifier::InCompartment {
                    compartment,
                    owners,
                }
            }
        };

        let transaction_applies_to = self.transaction_applies_to.unwrap_or(match op {
            RuleOp::Batch => TransactionAppliesTo::Batch,
            _ => TransactionAppliesTo::Transaction,
        });

        Ok(Rule {
            inner: Arc::new(RuleDef {
                name,
                op,
                mode,
                applies_to,
                classifier,
                transaction_applies_to,
            }),
        })
    }
}
