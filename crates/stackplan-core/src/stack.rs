//! Deployment stack identity.

use serde::{Deserialize, Serialize};

/// Stack names treated as production.
pub const PRODUCTION_STACKS: &[&str] = &["prod", "production"];

/// A named deployment environment instance (e.g. `prod`, a preview branch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    name: String,
    is_production: bool,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let is_production = PRODUCTION_STACKS.contains(&name.as_str());
        Self {
            name,
            is_production,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_production(&self) -> bool {
        self.is_production
    }

    /// Runtime mode injected into the application (`NODE_ENV`).
    pub fn runtime_mode(&self) -> &'static str {
        if self.is_production {
            "production"
        } else {
            "development"
        }
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
