//! Request identifiers

use serde::{Deserialize, Serialize};

/// Prefix carried by every generated request identifier
pub const REQUEST_ID_PREFIX: &str = "REQ-";

/// Unique identifier for a permission request (e.g. `REQ-LX3K9A2B-4F7QZP`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier carries the `REQ-` prefix
    pub fn has_request_prefix(&self) -> bool {
        self.0.starts_with(REQUEST_ID_PREFIX)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
