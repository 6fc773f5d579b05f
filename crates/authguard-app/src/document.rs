//! JSON document model used by the CLI: resources are plain `serde_json::Value`s.
//!
//! - `resourceType` names the type
//! - bundles carry `type` and `entry[]` with `resource` and `request.method`
//! - compartment membership is decided from the owner itself or from `reference` fields

use authguard_domain::{BundleEntry, ContextOracle};
use authguard_types::{BundleKind, OwnerId, RequestMethod};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonOracle;

impl ContextOracle for JsonOracle {
    type Resource = Value;

    fn resource_type_of<'r>(&self, resource: &'r Value) -> &'r str {
        resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    fn bundle_kind(&self, bundle: &Value) -> BundleKind {
        if self.resource_type_of(bundle) != "Bundle" {
            return BundleKind::Other;
        }
        // Response bundles are judged by the kind of request they answer.
        match bundle.get("type").and_then(Value::as_str) {
            Some("transaction" | "transaction-response") => BundleKind::Transaction,
            Some("batch" | "batch-response") => BundleKind::Batch,
            _ => BundleKind::Other,
        }
    }

    fn decompose<'r>(&self, bundle: &'r Value) -> Vec<BundleEntry<'r, Value>> {
        let Some(entries) = bundle.get("entry").and_then(Value::as_array) else {
            return Vec::new();
        };
        entries
            .iter()
            .map(|entry| {
                let resource = entry.get("resource").filter(|r| !r.is_null());
                let method = entry
                    .pointer("/request/method")
                    .and_then(Value::as_str)
                    .and_then(RequestMethod::from_token);
                BundleEntry::new(resource, method)
            })
            .collect()
    }

    fn is_in_compartment(&self, compartment: &str, resource: &Value, owner: &OwnerId) -> bool {
        if owner.resource_type() != Some(compartment) {
            return false;
        }
        let is_owner = self.resource_type_of(resource) == compartment
            && resource.get("id").and_then(Value::as_str) == Some(owner.id_part());
        is_owner || references_owner(resource, owner)
    }
}

fn references_owner(value: &Value, owner: &OwnerId) -> bool {
    match value {
        Value::Object(map) => map.iter().any(|(key, v)| match (key.as_str(), v) {
            ("reference", Value::String(reference)) => reference_matches(reference, owner),
            _ => references_owner(v, owner),
        }),
        Value::Array(items) => items.iter().any(|v| references_owner(v, owner)),
        _ => false,
    }
}

fn reference_matches(reference: &str, owner: &OwnerId) -> bool {
    let reference = OwnerId::new(reference);
    reference == *owner
        || (reference.resource_type() == owner.resource_type()
            && reference.id_part() == owner.id_part())
}
