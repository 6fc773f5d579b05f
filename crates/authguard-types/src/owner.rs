use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the owner of a compartment, e.g. `Patient/123`.
///
/// Normalization rules are intentionally simple and deterministic:
/// - surrounding whitespace is dropped
/// - a trailing `/_history/<version>` suffix is dropped (owners are versionless)
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let v = s.as_ref().trim();
        let v = match v.find("/_history/") {
            Some(idx) => &v[..idx],
            None => v,
        };
        Self(v.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resource type part (`Patient` in `Patient/123`), if the reference is typed.
    pub fn resource_type(&self) -> Option<&str> {
        self.split().map(|(ty, _)| ty)
    }

    /// Logical id part (`123` in `Patient/123`).
    pub fn id_part(&self) -> &str {
        match self.split() {
            Some((_, id)) => id,
            None => &self.0,
        }
    }

    fn split(&self) -> Option<(&str, &str)> {
        self.0
            .rsplit_once('/')
            .filter(|(ty, id)| !ty.is_empty() && !id.is_empty())
            .map(|(ty, id)| (ty.rsplit('/').next().unwrap_or(ty), id))
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        OwnerId::new(value)
    }
}
