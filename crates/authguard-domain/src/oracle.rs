//! Seams to the resource model the rules run against.
//!
//! The engine never inspects resources itself. Everything it needs to know about a
//! resource (its type, whether it is a bundle and what is inside, which compartments it
//! belongs to) comes from a [`ContextOracle`] supplied with the request.

use authguard_types::{BundleKind, OwnerId, RequestMethod};

pub trait ContextOracle {
    type Resource;

    /// Type token of a resource, e.g. `Patient`.
    fn resource_type_of<'r>(&self, resource: &'r Self::Resource) -> &'r str;

    /// Declared kind of a composite document. Anything that is not a batch or
    /// transaction reports `BundleKind::Other`.
    fn bundle_kind(&self, bundle: &Self::Resource) -> BundleKind;

    /// Entries of a composite document, in document order.
    fn decompose<'r>(&self, bundle: &'r Self::Resource) -> Vec<BundleEntry<'r, Self::Resource>>;

    fn is_in_compartment(
        &self,
        compartment: &str,
        resource: &Self::Resource,
        owner: &OwnerId,
    ) -> bool;
}

/// One sub-operation of a batch or transaction.
#[derive(Debug)]
pub struct BundleEntry<'r, R> {
    pub resource: Option<&'r R>,
    /// `None` when the entry declares no method or one the oracle could not parse.
    pub method: Option<RequestMethod>,
}

impl<'r, R> BundleEntry<'r, R> {
    pub fn new(resource: Option<&'r R>, method: Option<RequestMethod>) -> Self {
        Self { resource, method }
    }
}

impl<R> Clone for BundleEntry<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for BundleEntry<'_, R> {}

/// Per-call request context handed to every rule.
pub struct RequestDetails<'a, O> {
    oracle: &'a O,
    request_id: Option<&'a str>,
}

impl<'a, O: ContextOracle> RequestDetails<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            request_id: None,
        }
    }

    /// Attach a correlation id; it only shows up in log events.
    pub fn with_request_id(mut self, request_id: &'a str) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn oracle(&self) -> &'a O {
        self.oracle
    }

    pub fn request_id(&self) -> Option<&'a str> {
        self.request_id
    }
}
