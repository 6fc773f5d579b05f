//! Rule-based authorization for resource-oriented APIs.
//!
//! This crate re-exports the evaluation engine for embedders that bring their own
//! resource model. Implement [`ContextOracle`] for it, build [`Rule`]s, and ask a
//! [`RuleChain`] for a decision:
//!
//! ```
//! use authguard::{BundleEntry, BundleKind, ContextOracle, OwnerId, PolicyMode};
//! use authguard::{OperationKind, RequestDetails, Rule, RuleChain, RuleOp};
//!
//! struct Doc(&'static str);
//! struct Oracle;
//!
//! impl ContextOracle for Oracle {
//!     type Resource = Doc;
//!     fn resource_type_of<'r>(&self, r: &'r Doc) -> &'r str {
//!         r.0
//!     }
//!     fn bundle_kind(&self, _: &Doc) -> BundleKind {
//!         BundleKind::Other
//!     }
//!     fn decompose<'r>(&self, _: &'r Doc) -> Vec<BundleEntry<'r, Doc>> {
//!         Vec::new()
//!     }
//!     fn is_in_compartment(&self, _: &str, _: &Doc, _: &OwnerId) -> bool {
//!         false
//!     }
//! }
//!
//! let rules = vec![
//!     Rule::builder("read patients")
//!         .allow()
//!         .op(RuleOp::Read)
//!         .resources_of_type(["Patient"])
//!         .build()
//!         .unwrap(),
//! ];
//! let chain = RuleChain::new(rules, PolicyMode::Deny);
//! let request = RequestDetails::new(&Oracle);
//!
//! let auth = chain
//!     .authorize(OperationKind::Read, &request, None, Some(&Doc("Patient")))
//!     .unwrap();
//! assert!(auth.is_allowed());
//! assert_eq!(auth.rule_name(), Some("read patients"));
//! ```

#![forbid(unsafe_code)]

pub use authguard_domain::*;
pub use authguard_types::{BundleKind, OperationKind, OwnerId, PolicyMode, RequestMethod};
