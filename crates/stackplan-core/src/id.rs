//! Resource names and deferred references.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Logical name of a declared resource, unique within a plan.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reference an attribute of this resource that is only known after apply.
    pub fn attr(&self, attribute: impl Into<String>) -> ResourceRef {
        ResourceRef {
            resource: self.clone(),
            attribute: attribute.into(),
        }
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ResourceName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A reference to an attribute the apply engine assigns (e.g. `project.id`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("{resource}.{attribute}")]
pub struct ResourceRef {
    pub resource: ResourceName,
    pub attribute: String,
}
