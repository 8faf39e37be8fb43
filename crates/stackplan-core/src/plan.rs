//! The desired-state plan handed to the apply engine.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::database::{DatabaseProject, DatabaseProvider};
use crate::hosting::HostingProject;
use crate::id::{ResourceName, ResourceRef};
use crate::secret::REDACTED;
use crate::stack::Stack;
use crate::value::Value;
use crate::variable::EnvironmentVariable;
use crate::{Error, Result};

/// What the apply engine should do with a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Create the resource if it does not exist yet.
    Create,
    /// Adopt an existing resource by its provider id.
    Import { id: String },
    /// Create a resource whose presence depends on resolved configuration.
    CreateIf { condition: String },
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Import { id } => write!(f, "import {}", id),
            Operation::CreateIf { condition } => write!(f, "create if {}", condition),
        }
    }
}

/// A declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "properties", rename_all = "snake_case")]
pub enum Resource {
    HostingProject(HostingProject),
    DatabaseProject(DatabaseProject),
    EnvironmentVariable(EnvironmentVariable),
}

impl Resource {
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::HostingProject(_) => "hosting_project",
            Resource::DatabaseProject(_) => "database_project",
            Resource::EnvironmentVariable(_) => "environment_variable",
        }
    }

    pub fn import_id(&self) -> Option<&str> {
        match self {
            Resource::HostingProject(p) => p.import_id(),
            Resource::DatabaseProject(_) => None,
            Resource::EnvironmentVariable(v) => v.import_id(),
        }
    }

    /// Deferred references in the resource's values, in field order.
    pub fn references(&self) -> Vec<&ResourceRef> {
        match self {
            Resource::HostingProject(_) => Vec::new(),
            Resource::DatabaseProject(DatabaseProject::Supabase {
                database_password, ..
            }) => database_password.references().collect(),
            Resource::DatabaseProject(DatabaseProject::Neon { .. }) => Vec::new(),
            Resource::EnvironmentVariable(v) => v
                .project_id()
                .into_iter()
                .flat_map(|p| p.references())
                .chain(v.value().references())
                .collect(),
        }
    }
}

/// One entry of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDeclaration {
    pub name: ResourceName,
    pub operation: Operation,
    pub depends_on: Vec<ResourceName>,
    pub resource: Resource,
}

impl ResourceDeclaration {
    /// Declare a resource. Imports follow the resource's own import id and
    /// dependencies follow the references in its values.
    pub fn new(name: impl Into<ResourceName>, resource: Resource) -> Self {
        let operation = match resource.import_id() {
            Some(id) => Operation::Import { id: id.to_string() },
            None => Operation::Create,
        };
        let mut depends_on: Vec<ResourceName> = Vec::new();
        for reference in resource.references() {
            if !depends_on.contains(&reference.resource) {
                depends_on.push(reference.resource.clone());
            }
        }
        Self {
            name: name.into(),
            operation,
            depends_on,
            resource,
        }
    }

    /// Turn a plain create into a conditional one. Imports are left alone.
    pub fn conditional(mut self, condition: impl Into<String>) -> Self {
        if self.operation == Operation::Create {
            self.operation = Operation::CreateIf {
                condition: condition.into(),
            };
        }
        self
    }
}

/// Named outputs exported for downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutputs {
    pub db_provider_selected: DatabaseProvider,
    pub database_url: Value,
    pub hosting_project_id: Value,
}

/// Ordered desired state for one stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub stack: Stack,
    pub resources: Vec<ResourceDeclaration>,
    pub outputs: PlanOutputs,
}

impl Plan {
    pub fn get(&self, name: &str) -> Option<&ResourceDeclaration> {
        self.resources.iter().find(|r| r.name.as_str() == name)
    }

    pub fn variables(&self) -> impl Iterator<Item = &EnvironmentVariable> {
        self.resources.iter().filter_map(|r| match &r.resource {
            Resource::EnvironmentVariable(v) => Some(v),
            _ => None,
        })
    }

    pub fn variable(&self, key: &str) -> Option<&EnvironmentVariable> {
        self.variables().find(|v| v.key() == key)
    }

    pub fn hosting_project(&self) -> Option<&HostingProject> {
        self.resources.iter().find_map(|r| match &r.resource {
            Resource::HostingProject(p) => Some(p),
            _ => None,
        })
    }

    /// Render the plan as JSON, redacting secrets unless `reveal` is set.
    pub fn to_json(&self, reveal: bool) -> Result<serde_json::Value> {
        let mut json = serde_json::to_value(self)?;
        if !reveal {
            redact(&mut json);
        }
        Ok(json)
    }

    /// Hex SHA-256 of the revealed plan. Equal inputs give equal fingerprints.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.to_json(true)?)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Check ordering and sensitivity invariants.
    pub fn validate(&self) -> Result<()> {
        let mut declared: HashSet<&ResourceName> = HashSet::new();
        for decl in &self.resources {
            for dep in &decl.depends_on {
                if !declared.contains(dep) {
                    return Err(Error::InvalidPlan(format!(
                        "'{}' depends on '{}' which is not declared before it",
                        decl.name, dep
                    )));
                }
            }
            if let Resource::EnvironmentVariable(var) = &decl.resource {
                if var.targets().is_empty() {
                    return Err(Error::InvalidPlan(format!(
                        "variable '{}' has no targets",
                        var.key()
                    )));
                }
                if var.is_sensitive() && !var.value().is_secret() {
                    return Err(Error::InvalidPlan(format!(
                        "sensitive variable '{}' has a non-secret value",
                        var.key()
                    )));
                }
            }
            if !declared.insert(&decl.name) {
                return Err(Error::InvalidPlan(format!(
                    "duplicate declaration '{}'",
                    decl.name
                )));
            }
        }
        Ok(())
    }
}

/// Replace every serialized secret fragment (`{"secret": "..."}`) with a placeholder.
pub fn redact(json: &mut serde_json::Value) {
    match json {
        serde_json::Value::Object(map) => {
            if map.len() == 1 && matches!(map.get("secret"), Some(serde_json::Value::String(_))) {
                map.insert(
                    "secret".to_string(),
                    serde_json::Value::String(REDACTED.to_string()),
                );
                return;
            }
            for value in map.values_mut() {
                redact(value);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                redact(item);
            }
        }
        _ => {}
    }
}
