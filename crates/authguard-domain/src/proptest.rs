//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - unconditional rules ignoring their inputs
//! - most-restrictive aggregation over composite entries
//! - filters never turning an abstention into a decision

use crate::engine::most_restrictive;
use crate::model::RuleOp;
use crate::oracle::RequestDetails;
use crate::rule::Rule;
use crate::test_support::{
    bundle, entry, resource, rule, verdict, ScriptedApplier, TestOracle,
};
use authguard_types::{BundleKind, OperationKind, PolicyMode, RequestMethod};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_mode() -> impl Strategy<Value = PolicyMode> {
    prop_oneof![Just(PolicyMode::Allow), Just(PolicyMode::Deny)]
}

fn arb_operation() -> impl Strategy<Value = OperationKind> {
    prop::sample::select(OperationKind::ALL.to_vec())
}

/// Entry results as the chain would report them: abstain, allow or deny.
fn arb_entry_results() -> impl Strategy<Value = Vec<Option<PolicyMode>>> {
    prop::collection::vec(prop::option::of(arb_mode()), 0..12)
}

fn arb_resource_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Patient".to_string()),
        Just("Observation".to_string()),
        Just("Encounter".to_string()),
        prop::string::string_regex("[A-Z][a-zA-Z]{0,15}").unwrap(),
    ]
}

/// Reference model for aggregation: abstain if nothing decided, otherwise deny if any
/// entry denied.
fn expected_aggregate(results: &[Option<PolicyMode>]) -> Option<PolicyMode> {
    let decided: Vec<PolicyMode> = results.iter().flatten().copied().collect();
    if decided.is_empty() {
        None
    } else if decided.contains(&PolicyMode::Deny) {
        Some(PolicyMode::Deny)
    } else {
        Some(PolicyMode::Allow)
    }
}

proptest! {
    #[test]
    fn unconditional_rules_always_decide(
        op in arb_operation(),
        has_input in any::<bool>(),
        has_output in any::<bool>(),
    ) {
        let oracle = TestOracle::default();
        let request = RequestDetails::new(&oracle);
        let applier = ScriptedApplier::default();
        let patient = resource("Patient");
        let input = has_input.then_some(&patient);
        let output = has_output.then_some(&patient);

        let allow = Rule::allow_all("allow");
        let deny = Rule::deny_all("deny");

        let a = allow.evaluate(op, &request, input, output, &applier).unwrap().unwrap();
        let d = deny.evaluate(op, &request, input, output, &applier).unwrap().unwrap();
        prop_assert_eq!(a.decision(), PolicyMode::Allow);
        prop_assert_eq!(d.decision(), PolicyMode::Deny);
    }

    #[test]
    fn fold_matches_reference_model(results in arb_entry_results()) {
        let folded = results
            .iter()
            .enumerate()
            .fold(None, |acc, (i, r)| {
                most_restrictive(acc, r.map(|m| verdict(m, &format!("r{i}"))))
            });
        prop_assert_eq!(folded.map(|v| v.decision()), expected_aggregate(&results));
    }

    #[test]
    fn allow_transaction_matches_reference_model(results in arb_entry_results()) {
        let oracle = TestOracle::default();
        let request = RequestDetails::new(&oracle);
        let tx = rule("tx", PolicyMode::Allow, RuleOp::Transaction);

        let entries = results
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let method = if i % 2 == 0 { RequestMethod::Post } else { RequestMethod::Put };
                entry(method, "Patient")
            })
            .collect();
        let input = bundle(BundleKind::Transaction, entries);
        let applier = ScriptedApplier::from_modes(&results);

        let outcome = tx
            .evaluate(OperationKind::Transaction, &request, Some(&input), None, &applier)
            .unwrap()
            .map(|v| v.decision());
        prop_assert_eq!(outcome, expected_aggregate(&results));
        prop_assert_eq!(applier.calls().len(), results.len());
    }

    #[test]
    fn deny_transaction_never_decomposes(len in 0usize..8) {
        let oracle = TestOracle::default();
        let request = RequestDetails::new(&oracle);
        let tx = rule("tx", PolicyMode::Deny, RuleOp::Transaction);
        let entries = (0..len).map(|_| entry(RequestMethod::Post, "Patient")).collect();
        let input = bundle(BundleKind::Transaction, entries);
        let applier = ScriptedApplier::default();

        let outcome = tx
            .evaluate(OperationKind::Transaction, &request, Some(&input), None, &applier)
            .unwrap()
            .map(|v| v.decision());
        prop_assert_eq!(outcome, Some(PolicyMode::Deny));
        prop_assert_eq!(oracle.decompose_calls(), 0);
    }

    #[test]
    fn types_filter_is_membership(
        configured in prop::collection::btree_set(arb_resource_type(), 1..4),
        actual in arb_resource_type(),
        mode in arb_mode(),
    ) {
        let oracle = TestOracle::default();
        let request = RequestDetails::new(&oracle);
        let applier = ScriptedApplier::default();
        let read = Rule::builder("typed")
            .mode(mode)
            .op(RuleOp::Read)
            .resources_of_type(configured.clone())
            .build()
            .unwrap();

        let target = resource(&actual);
        let outcome = read
            .evaluate(OperationKind::Read, &request, None, Some(&target), &applier)
            .unwrap()
            .map(|v| v.decision());
        let expected = configured.contains(&actual).then_some(mode);
        prop_assert_eq!(outcome, expected);
    }
}
