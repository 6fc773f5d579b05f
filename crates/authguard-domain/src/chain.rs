use crate::applier::{Evaluation, RuleApplier};
use crate::error::MalformedRequest;
use crate::oracle::{ContextOracle, RequestDetails};
use crate::rule::Rule;
use crate::verdict::Verdict;
use authguard_types::{OperationKind, PolicyMode};

/// Ordered rules plus the policy applied when every rule abstains.
#[derive(Clone, Debug)]
pub struct RuleChain {
    rules: Vec<Rule>,
    default_policy: PolicyMode,
}

/// Final answer for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    pub decision: PolicyMode,
    /// `None` when no rule had an opinion and the default policy decided.
    pub verdict: Option<Verdict>,
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        self.decision == PolicyMode::Allow
    }

    pub fn rule_name(&self) -> Option<&str> {
        self.verdict.as_ref().map(|v| v.rule().name())
    }
}

impl RuleChain {
    pub fn new(rules: Vec<Rule>, default_policy: PolicyMode) -> Self {
        Self {
            rules,
            default_policy,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_policy(&self) -> PolicyMode {
        self.default_policy
    }

    /// Run the chain and fall back to the default policy when every rule abstains.
    pub fn authorize<O: ContextOracle>(
        &self,
        operation: OperationKind,
        request: &RequestDetails<'_, O>,
        input: Option<&O::Resource>,
        output: Option<&O::Resource>,
    ) -> Result<Authorization, MalformedRequest> {
        match self.apply_rules_and_return_decision(operation, request, input, output)? {
            Some(verdict) => Ok(Authorization {
                decision: verdict.decision(),
                verdict: Some(verdict),
            }),
            None => {
                tracing::debug!(
                    operation = operation.as_str(),
                    decision = self.default_policy.as_str(),
                    request_id = request.request_id().unwrap_or("-"),
                    "no rule matched; applying default policy"
                );
                Ok(Authorization {
                    decision: self.default_policy,
                    verdict: None,
                })
            }
        }
    }
}

impl<O: ContextOracle> RuleApplier<O> for RuleChain {
    /// First rule with an opinion wins.
    fn apply_rules_and_return_decision(
        &self,
        operation: OperationKind,
        request: &RequestDetails<'_, O>,
        input: Option<&O::Resource>,
        output: Option<&O::Resource>,
    ) -> Evaluation {
        for rule in &self.rules {
            if let Some(verdict) = rule.evaluate(operation, request, input, output, self)? {
                return Ok(Some(verdict));
            }
        }
        Ok(None)
    }
}
