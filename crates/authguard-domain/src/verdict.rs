use crate::rule::Rule;
use authguard_types::PolicyMode;

/// Outcome of a rule that had an opinion: the decision plus the rule that made it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    decision: PolicyMode,
    rule: Rule,
}

impl Verdict {
    pub fn new(decision: PolicyMode, rule: Rule) -> Self {
        Self { decision, rule }
    }

    pub fn decision(&self) -> PolicyMode {
        self.decision
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn is_allow(&self) -> bool {
        self.decision == PolicyMode::Allow
    }
}
