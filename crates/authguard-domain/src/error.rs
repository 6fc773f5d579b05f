use authguard_types::{ids, RequestMethod};
use thiserror::Error;

/// A request that cannot be evaluated safely. Always aborts the whole call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedRequest {
    #[error("can not handle transaction with operation of type {} (entry {index})", method_label(.method))]
    UnsupportedEntryMethod {
        index: usize,
        method: Option<RequestMethod>,
    },
    #[error("can not handle transaction with nested resource of type {resource_type} (entry {index})")]
    NestedComposite { index: usize, resource_type: String },
    #[error("can not handle transaction entry {index} without a resource")]
    MissingEntryResource { index: usize },
}

impl MalformedRequest {
    /// Stable reason code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            MalformedRequest::UnsupportedEntryMethod { .. } => ids::CODE_UNSUPPORTED_ENTRY_METHOD,
            MalformedRequest::NestedComposite { .. } => ids::CODE_NESTED_COMPOSITE,
            MalformedRequest::MissingEntryResource { .. } => ids::CODE_MISSING_ENTRY_RESOURCE,
        }
    }
}

fn method_label(method: &Option<RequestMethod>) -> &'static str {
    match method {
        Some(m) => m.as_str(),
        None => "<none>",
    }
}
