use crate::applier::{Evaluation, RuleApplier};
use crate::model::RuleOp;
use crate::oracle::{BundleEntry, ContextOracle, RequestDetails};
use crate::rule::Rule;
use crate::verdict::Verdict;
use authguard_types::{BundleKind, OperationKind, OwnerId, PolicyMode, RequestMethod};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug, PartialEq)]
pub struct TestResource {
    pub resource_type: String,
    pub compartments: Vec<(String, OwnerId)>,
    pub bundle_kind: BundleKind,
    pub entries: Vec<TestEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TestEntry {
    pub method: Option<RequestMethod>,
    pub resource: Option<TestResource>,
}

pub fn resource(resource_type: &str) -> TestResource {
    TestResource {
        resource_type: resource_type.to_string(),
        compartments: Vec::new(),
        bundle_kind: BundleKind::Other,
        entries: Vec::new(),
    }
}

pub fn owned_resource(resource_type: &str, compartment: &str, owner: &str) -> TestResource {
    let mut r = resource(resource_type);
    r.compartments
        .push((compartment.to_string(), OwnerId::new(owner)));
    r
}

pub fn bundle(kind: BundleKind, entries: Vec<TestEntry>) -> TestResource {
    TestResource {
        resource_type: "Bundle".to_string(),
        compartments: Vec::new(),
        bundle_kind: kind,
        entries,
    }
}

pub fn entry(method: RequestMethod, resource_type: &str) -> TestEntry {
    TestEntry {
        method: Some(method),
        resource: Some(resource(resource_type)),
    }
}

/// Oracle over `TestResource`, counting how often bundles are decomposed.
#[derive(Debug, Default)]
pub struct TestOracle {
    decompose_calls: AtomicUsize,
}

impl TestOracle {
    pub fn decompose_calls(&self) -> usize {
        self.decompose_calls.load(Ordering::SeqCst)
    }
}

impl ContextOracle for TestOracle {
    type Resource = TestResource;

    fn resource_type_of<'r>(&self, resource: &'r TestResource) -> &'r str {
        &resource.resource_type
    }

    fn bundle_kind(&self, bundle: &TestResource) -> BundleKind {
        bundle.bundle_kind
    }

    fn decompose<'r>(&self, bundle: &'r TestResource) -> Vec<BundleEntry<'r, TestResource>> {
        self.decompose_calls.fetch_add(1, Ordering::SeqCst);
        bundle
            .entries
            .iter()
            .map(|e| BundleEntry::new(e.resource.as_ref(), e.method))
            .collect()
    }

    fn is_in_compartment(&self, compartment: &str, resource: &TestResource, owner: &OwnerId) -> bool {
        resource
            .compartments
            .iter()
            .any(|(c, o)| c == compartment && o == owner)
    }
}

/// Applier returning pre-scripted results in call order, recording each call.
/// Once the script runs out it abstains.
#[derive(Debug, Default)]
pub struct ScriptedApplier {
    script: Mutex<VecDeque<Evaluation>>,
    calls: Mutex<Vec<(OperationKind, String)>>,
}

impl ScriptedApplier {
    pub fn new(script: Vec<Evaluation>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn from_modes(modes: &[Option<PolicyMode>]) -> Self {
        Self::new(
            modes
                .iter()
                .enumerate()
                .map(|(i, mode)| Ok(mode.map(|m| verdict(m, &format!("entry-{i}")))))
                .collect(),
        )
    }

    /// `(operation, resource type)` of every call, in order.
    pub fn calls(&self) -> Vec<(OperationKind, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl RuleApplier<TestOracle> for ScriptedApplier {
    fn apply_rules_and_return_decision(
        &self,
        operation: OperationKind,
        _request: &RequestDetails<'_, TestOracle>,
        input: Option<&TestResource>,
        output: Option<&TestResource>,
    ) -> Evaluation {
        let resource_type = input
            .or(output)
            .map(|r| r.resource_type.clone())
            .unwrap_or_default();
        self.calls
            .lock()
            .expect("calls lock")
            .push((operation, resource_type));
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

pub fn verdict(mode: PolicyMode, rule_name: &str) -> Verdict {
    let rule = match mode {
        PolicyMode::Allow => Rule::allow_all(rule_name),
        PolicyMode::Deny => Rule::deny_all(rule_name),
    };
    Verdict::new(mode, rule)
}

pub fn rule(name: &str, mode: PolicyMode, op: RuleOp) -> Rule {
    Rule::builder(name)
        .mode(mode)
        .op(op)
        .build()
        .expect("valid test rule")
}
