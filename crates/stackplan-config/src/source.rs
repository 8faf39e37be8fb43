//! Raw configuration sources: the KDL stack file and the process environment.

use kdl::{KdlDocument, KdlNode};
use stackplan_core::SecretString;
use std::collections::BTreeMap;
use std::path::Path;

use crate::options;
use crate::{ConfigError, ConfigResult};

/// A configured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Text(String),
    Bool(bool),
    Secret(SecretString),
}

impl ConfigValue {
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigValue::Secret(_))
    }

    /// An empty string, plain or secret. Treated the same as an unset option.
    pub fn is_blank(&self) -> bool {
        match self {
            ConfigValue::Text(text) => text.is_empty(),
            ConfigValue::Secret(secret) => secret.expose().is_empty(),
            ConfigValue::Bool(_) => false,
        }
    }

    /// Wrap the value as a secret, keeping its textual form.
    pub fn into_secret(self) -> Self {
        match self {
            ConfigValue::Text(text) => ConfigValue::Secret(SecretString::new(text)),
            ConfigValue::Bool(b) => ConfigValue::Secret(SecretString::new(b.to_string())),
            secret => secret,
        }
    }
}

/// Option values as written, before defaults and fallbacks.
///
/// ```kdl
/// config {
///     appName "demo"
/// }
/// stack "prod" {
///     supabaseDbPassword "pw" secret=#true
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    project: BTreeMap<String, ConfigValue>,
    stacks: BTreeMap<String, BTreeMap<String, ConfigValue>>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stack configuration file from KDL text.
    pub fn parse(kdl: &str) -> ConfigResult<Self> {
        let doc: KdlDocument = kdl.parse()?;
        let mut raw = Self::new();

        for node in doc.nodes() {
            match node.name().value() {
                "config" => {
                    parse_block(node, &mut raw.project, "config")?;
                }
                "stack" => {
                    let name = get_first_string_arg(node)
                        .ok_or_else(|| ConfigError::InvalidValue {
                            field: "stack".to_string(),
                            message: "stack block needs a name".to_string(),
                        })?;
                    if raw.stacks.contains_key(&name) {
                        return Err(ConfigError::Duplicate(format!("stack '{}'", name)));
                    }
                    let mut values = BTreeMap::new();
                    parse_block(node, &mut values, &name)?;
                    raw.stacks.insert(name, values);
                }
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: other.to_string(),
                        message: "expected a 'config' or 'stack' block".to_string(),
                    });
                }
            }
        }

        Ok(raw)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Set a project-wide value.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.project
            .insert(key.to_string(), ConfigValue::Text(value.into()));
        self
    }

    pub fn with_bool(mut self, key: &str, value: bool) -> Self {
        self.project.insert(key.to_string(), ConfigValue::Bool(value));
        self
    }

    pub fn with_secret(mut self, key: &str, value: impl Into<String>) -> Self {
        self.project.insert(
            key.to_string(),
            ConfigValue::Secret(SecretString::new(value.into())),
        );
        self
    }

    /// Set a value scoped to one stack.
    pub fn with_stack_value(mut self, stack: &str, key: &str, value: ConfigValue) -> Self {
        self.stacks
            .entry(stack.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self
    }

    pub fn project_values(&self) -> &BTreeMap<String, ConfigValue> {
        &self.project
    }

    pub fn stack_values(&self, stack: &str) -> Option<&BTreeMap<String, ConfigValue>> {
        self.stacks.get(stack)
    }

}

fn parse_block(
    node: &KdlNode,
    values: &mut BTreeMap<String, ConfigValue>,
    scope: &str,
) -> ConfigResult<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    for child in children.nodes() {
        let key = child.name().value().to_string();
        let Some(value) = parse_value(child)? else {
            continue;
        };
        if values.contains_key(&key) {
            return Err(ConfigError::Duplicate(format!("'{}' in {}", key, scope)));
        }
        values.insert(key, value);
    }
    Ok(())
}

/// Read `<key> <value> [secret=#true]`; `#null` counts as unset.
fn parse_value(node: &KdlNode) -> ConfigResult<Option<ConfigValue>> {
    let key = node.name().value();
    let arg = node
        .entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
        .ok_or_else(|| ConfigError::InvalidValue {
            field: key.to_string(),
            message: "missing value".to_string(),
        })?;

    let value = if let Some(s) = arg.as_string() {
        ConfigValue::Text(s.to_string())
    } else if let Some(b) = arg.as_bool() {
        ConfigValue::Bool(b)
    } else if let Some(i) = arg.as_integer() {
        ConfigValue::Text(i.to_string())
    } else if let Some(f) = arg.as_float() {
        ConfigValue::Text(f.to_string())
    } else {
        return Ok(None);
    };

    let secret = node.get("secret").and_then(|v| v.as_bool()).unwrap_or(false);
    Ok(Some(if secret { value.into_secret() } else { value }))
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// Allow-listed process environment values used as fallbacks.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: BTreeMap<String, String>,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture only the allow-listed variables from the current process.
    pub fn from_process() -> Self {
        let mut env = Self::new();
        for name in options::env_allow_list() {
            if let Ok(value) = std::env::var(name) {
                env = env.with(name, value);
            }
        }
        env
    }

    /// Empty values are treated as unset.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.vars.insert(name.to_string(), value);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|s| s.as_str())
    }
}
