use crate::applier::{Evaluation, RuleApplier};
use crate::error::MalformedRequest;
use crate::model::{Classifier, RuleOp};
use crate::oracle::{ContextOracle, RequestDetails};
use crate::rule::Rule;
use crate::verdict::Verdict;
use authguard_types::{ids, OperationKind, PolicyMode, RequestMethod};

impl Rule {
    /// Evaluate this rule against one operation.
    ///
    /// `input` is the resource submitted by the caller, `output` the resource about to be
    /// returned. Batch and transaction rules evaluate their entries through `applier`,
    /// i.e. against the whole chain, not just this rule.
    pub fn evaluate<O: ContextOracle>(
        &self,
        operation: OperationKind,
        request: &RequestDetails<'_, O>,
        input: Option<&O::Resource>,
        output: Option<&O::Resource>,
        applier: &dyn RuleApplier<O>,
    ) -> Evaluation {
        let target = match self.op() {
            RuleOp::Read => match output {
                Some(resource) => resource,
                None => return Ok(None),
            },
            RuleOp::Write => match input {
                Some(resource) => resource,
                None => return Ok(None),
            },
            RuleOp::Delete => {
                if operation != OperationKind::Delete {
                    return Ok(None);
                }
                // Delete by id: nothing to filter on.
                match input {
                    Some(resource) => resource,
                    None => return Ok(Some(self.decide(self.mode(), request))),
                }
            }
            RuleOp::Batch | RuleOp::Transaction => {
                return self.evaluate_composite(request, input, output, applier);
            }
            RuleOp::AllowAll => return Ok(Some(self.decide(PolicyMode::Allow, request))),
            RuleOp::DenyAll => return Ok(Some(self.decide(PolicyMode::Deny, request))),
            RuleOp::Metadata => {
                if operation != OperationKind::Metadata {
                    return Ok(None);
                }
                return Ok(Some(self.decide(self.mode(), request)));
            }
        };

        let oracle = request.oracle();
        let resource_type = oracle.resource_type_of(target);
        if !self.applies_to().matches(resource_type) {
            tracing::trace!(
                rule = self.name(),
                resource_type,
                "abstain: resource type not covered"
            );
            return Ok(None);
        }

        if let Classifier::InCompartment {
            compartment,
            owners,
        } = self.classifier()
        {
            let in_compartment = owners
                .iter()
                .any(|owner| oracle.is_in_compartment(compartment, target, owner));
            if !in_compartment {
                tracing::trace!(
                    rule = self.name(),
                    compartment = compartment.as_str(),
                    "abstain: resource outside compartment"
                );
                return Ok(None);
            }
        }

        Ok(Some(self.decide(self.mode(), request)))
    }

    fn evaluate_composite<O: ContextOracle>(
        &self,
        request: &RequestDetails<'_, O>,
        input: Option<&O::Resource>,
        output: Option<&O::Resource>,
        applier: &dyn RuleApplier<O>,
    ) -> Evaluation {
        let oracle = request.oracle();
        let wanted = self.transaction_applies_to();

        if let Some(bundle) = input {
            if !wanted.matches(oracle.bundle_kind(bundle)) {
                return Ok(None);
            }
            if self.mode() == PolicyMode::Deny {
                return Ok(Some(self.decide(PolicyMode::Deny, request)));
            }

            let mut aggregate = None;
            for (index, entry) in oracle.decompose(bundle).into_iter().enumerate() {
                let operation = match entry.method {
                    Some(RequestMethod::Get) => continue,
                    Some(RequestMethod::Post) => OperationKind::Create,
                    Some(RequestMethod::Put) => OperationKind::Update,
                    method => {
                        return Err(self.reject(
                            MalformedRequest::UnsupportedEntryMethod { index, method },
                            request,
                        ));
                    }
                };
                let Some(resource) = entry.resource else {
                    return Err(
                        self.reject(MalformedRequest::MissingEntryResource { index }, request)
                    );
                };
                let resource_type = oracle.resource_type_of(resource);
                if ids::is_composite_resource_type(resource_type) {
                    return Err(self.reject(
                        MalformedRequest::NestedComposite {
                            index,
                            resource_type: resource_type.to_string(),
                        },
                        request,
                    ));
                }

                let next =
                    applier.apply_rules_and_return_decision(operation, request, Some(resource), None)?;
                aggregate = most_restrictive(aggregate, next);
            }
            return Ok(aggregate);
        }

        let Some(bundle) = output else {
            return Ok(None);
        };
        if !wanted.matches(oracle.bundle_kind(bundle)) {
            return Ok(None);
        }

        let mut aggregate = None;
        for entry in oracle.decompose(bundle) {
            let Some(resource) = entry.resource else {
                continue;
            };
            let next = applier.apply_rules_and_return_decision(
                OperationKind::Read,
                request,
                None,
                Some(resource),
            )?;
            aggregate = most_restrictive(aggregate, next);
        }
        Ok(aggregate)
    }

    fn decide<O>(&self, decision: PolicyMode, request: &RequestDetails<'_, O>) -> Verdict
    where
        O: ContextOracle,
    {
        tracing::debug!(
            rule = self.name(),
            op = self.op().as_str(),
            decision = decision.as_str(),
            request_id = request.request_id().unwrap_or("-"),
            "rule decided"
        );
        Verdict::new(decision, self.clone())
    }

    fn reject<O>(&self, err: MalformedRequest, request: &RequestDetails<'_, O>) -> MalformedRequest
    where
        O: ContextOracle,
    {
        tracing::warn!(
            rule = self.name(),
            code = err.code(),
            request_id = request.request_id().unwrap_or("-"),
            "rejecting composite request: {err}"
        );
        err
    }
}

/// Fold one entry result into the running aggregate.
///
/// Abstentions are ignored, the first verdict is kept, and a later deny replaces an
/// allow. A deny is never replaced.
pub(crate) fn most_restrictive(current: Option<Verdict>, next: Option<Verdict>) -> Option<Verdict> {
    match (current, next) {
        (current, None) => current,
        (None, next) => next,
        (Some(current), Some(next)) => {
            if current.is_allow() && !next.is_allow() {
                Some(next)
            } else {
                Some(current)
            }
        }
    }
}
