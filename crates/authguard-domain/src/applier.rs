use crate::error::MalformedRequest;
use crate::oracle::{ContextOracle, RequestDetails};
use crate::verdict::Verdict;
use authguard_types::OperationKind;

/// Result of evaluating a rule or a chain.
///
/// `Ok(None)` is an abstention ("no opinion"), which is not a denial: the caller moves
/// on to the next rule. `Err` aborts the whole request.
pub type Evaluation = Result<Option<Verdict>, MalformedRequest>;

/// Evaluates the full configured rule chain for one operation.
///
/// Composite rules call back into the applier for each entry they unpack, so
/// implementations must be re-entrant.
pub trait RuleApplier<O: ContextOracle> {
    fn apply_rules_and_return_decision(
        &self,
        operation: OperationKind,
        request: &RequestDetails<'_, O>,
        input: Option<&O::Resource>,
        output: Option<&O::Resource>,
    ) -> Evaluation;
}
