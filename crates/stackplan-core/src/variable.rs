//! Environment variables injected by the hosting platform.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::value::Value;

/// Comment attached to every variable this tool manages.
pub const MANAGED_COMMENT: &str = "Managed by stackplan";

/// A hosting-platform environment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Production,
    Preview,
    Development,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Production => write!(f, "production"),
            Target::Preview => write!(f, "preview"),
            Target::Development => write!(f, "development"),
        }
    }
}

/// Which environments receive sensitive and standard variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentTargets {
    pub sensitive: BTreeSet<Target>,
    pub standard: BTreeSet<Target>,
}

/// A variable declared on the hosting project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVariable {
    key: String,
    value: Value,
    targets: BTreeSet<Target>,
    sensitive: bool,
    project_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<String>,
    comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    import_id: Option<String>,
}

impl EnvironmentVariable {
    fn new(key: &str, value: Value, targets: &BTreeSet<Target>, sensitive: bool) -> Self {
        debug_assert!(!targets.is_empty(), "variable {} has no targets", key);
        Self {
            key: key.to_string(),
            value,
            targets: targets.clone(),
            sensitive,
            project_id: None,
            team_id: None,
            comment: MANAGED_COMMENT.to_string(),
            import_id: None,
        }
    }

    /// A sensitive variable; its value is always secret.
    pub fn sensitive(key: &str, value: Value, targets: &BTreeSet<Target>) -> Self {
        Self::new(key, value.into_secret(), targets, true)
    }

    pub fn standard(key: &str, value: Value, targets: &BTreeSet<Target>) -> Self {
        Self::new(key, value, targets, false)
    }

    pub fn with_project(mut self, project_id: Value, team_id: Option<String>) -> Self {
        self.project_id = Some(project_id);
        self.team_id = team_id;
        self
    }

    pub fn with_import_id(mut self, import_id: Option<String>) -> Self {
        self.import_id = import_id;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn targets(&self) -> &BTreeSet<Target> {
        &self.targets
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn project_id(&self) -> Option<&Value> {
        self.project_id.as_ref()
    }

    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn import_id(&self) -> Option<&str> {
        self.import_id.as_deref()
    }
}
