//! Pure rule evaluation (no IO).
//!
//! Input: an operation, the resources it carries, and a context oracle supplied by the caller.
//! Output: a verdict, an abstention, or a malformed-request error.

#![forbid(unsafe_code)]

pub mod applier;
pub mod chain;
pub mod error;
pub mod model;
pub mod oracle;
pub mod rule;
pub mod verdict;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use applier::{Evaluation, RuleApplier};
pub use chain::{Authorization, RuleChain};
pub use error::MalformedRequest;
pub use model::{AppliesTo, Classifier, RuleOp, TransactionAppliesTo};
pub use oracle::{BundleEntry, ContextOracle, RequestDetails};
pub use rule::{Rule, RuleBuilder, RuleConfigError};
pub use verdict::Verdict;
