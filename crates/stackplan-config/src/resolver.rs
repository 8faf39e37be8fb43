//! Configuration resolution for a single stack.
//!
//! Each option is looked up in this order:
//! 1. Stack-scoped value (`stack "<name>" { ... }`)
//! 2. Project-wide value (`config { ... }`)
//! 3. Allow-listed process environment fallback
//! 4. Hard default from the option table
//!
//! Empty strings count as unset at every layer. Anything still missing is
//! absent. Required options are checked by the consumer through
//! [`Config::require`] and [`Config::require_secret`].

use stackplan_core::{SecretString, Stack};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::options::{self, OptionKind};
use crate::source::{ConfigValue, EnvSource, RawConfig};
use crate::{ConfigError, ConfigResult};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Stack,
    Project,
    Environment,
    Default,
}

#[derive(Debug, Clone)]
struct Entry {
    value: ConfigValue,
    source: ValueSource,
}

/// Merges raw sources into a [`Config`] for one stack.
pub struct ConfigResolver<'a> {
    raw: &'a RawConfig,
    env: &'a EnvSource,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(raw: &'a RawConfig, env: &'a EnvSource) -> Self {
        Self { raw, env }
    }

    pub fn resolve(&self, stack: &Stack) -> ConfigResult<Config> {
        let mut entries: BTreeMap<String, Entry> = BTreeMap::new();

        for (key, value) in self.raw.project_values() {
            if value.is_blank() {
                continue;
            }
            entries.insert(
                key.clone(),
                Entry {
                    value: value.clone(),
                    source: ValueSource::Project,
                },
            );
        }

        if let Some(values) = self.raw.stack_values(stack.name()) {
            for (key, value) in values {
                if value.is_blank() {
                    continue;
                }
                entries.insert(
                    key.clone(),
                    Entry {
                        value: value.clone(),
                        source: ValueSource::Stack,
                    },
                );
            }
        }

        for spec in options::OPTIONS {
            if !entries.contains_key(spec.key) {
                let fallback = spec
                    .env_fallback
                    .and_then(|var| self.env.get(var))
                    .map(|v| (v, ValueSource::Environment))
                    .or_else(|| spec.default.map(|d| (d, ValueSource::Default)));
                if let Some((value, source)) = fallback {
                    entries.insert(
                        spec.key.to_string(),
                        Entry {
                            value: ConfigValue::Text(value.to_string()),
                            source,
                        },
                    );
                }
            }

            let Some(entry) = entries.get_mut(spec.key) else {
                continue;
            };
            match spec.kind {
                OptionKind::Secret => {
                    entry.value = entry.value.clone().into_secret();
                }
                OptionKind::Bool => {
                    entry.value = ConfigValue::Bool(parse_bool(spec.key, &entry.value)?);
                }
                OptionKind::String => {
                    if entry.value.is_secret() {
                        return Err(ConfigError::InvalidValue {
                            field: spec.key.to_string(),
                            message: "option is not a secret and cannot be marked secret"
                                .to_string(),
                        });
                    }
                }
            }
        }

        for key in entries.keys() {
            if options::lookup(key).is_none() {
                warn!(stack = %stack, key = %key, "Unrecognized configuration option");
            }
        }

        debug!(stack = %stack, options = entries.len(), "Resolved configuration");

        Ok(Config {
            stack: stack.clone(),
            entries,
        })
    }
}

fn parse_bool(key: &str, value: &ConfigValue) -> ConfigResult<bool> {
    match value {
        ConfigValue::Bool(b) => Ok(*b),
        ConfigValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                field: key.to_string(),
                message: format!("expected a boolean, got '{}'", text),
            }),
        },
        ConfigValue::Secret(_) => Err(ConfigError::InvalidValue {
            field: key.to_string(),
            message: "a boolean option cannot be secret".to_string(),
        }),
    }
}

/// Resolved configuration for one stack, passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct Config {
    stack: Stack,
    entries: BTreeMap<String, Entry>,
}

impl Config {
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// A plain value. Secret entries are refused rather than handed out as text.
    pub fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        match self.entries.get(key).map(|e| &e.value) {
            None => Ok(None),
            Some(ConfigValue::Text(text)) => Ok(Some(text.clone())),
            Some(ConfigValue::Bool(b)) => Ok(Some(b.to_string())),
            Some(ConfigValue::Secret(_)) => Err(ConfigError::SecretAsPlain(key.to_string())),
        }
    }

    /// `None` when unset, so an explicit `false` stays distinguishable.
    pub fn get_bool(&self, key: &str) -> ConfigResult<Option<bool>> {
        self.entries
            .get(key)
            .map(|e| parse_bool(key, &e.value))
            .transpose()
    }

    /// Any value, wrapped as a secret.
    pub fn get_secret(&self, key: &str) -> ConfigResult<Option<SecretString>> {
        Ok(self.entries.get(key).map(|e| match &e.value {
            ConfigValue::Secret(secret) => secret.clone(),
            ConfigValue::Text(text) => SecretString::new(text.clone()),
            ConfigValue::Bool(b) => SecretString::new(b.to_string()),
        }))
    }

    pub fn require(&self, key: &str) -> ConfigResult<String> {
        self.get(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn require_secret(&self, key: &str) -> ConfigResult<SecretString> {
        self.get_secret(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn source(&self, key: &str) -> Option<ValueSource> {
        self.entries.get(key).map(|e| e.source)
    }

    pub fn is_secret(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| e.value.is_secret())
    }

    fn missing(&self, key: &str) -> ConfigError {
        ConfigError::MissingRequiredOption {
            key: key.to_string(),
            stack: self.stack.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::*;

    fn resolve(raw: &RawConfig, env: &EnvSource, stack: &str) -> Config {
        ConfigResolver::new(raw, env)
            .resolve(&Stack::new(stack))
            .unwrap()
    }

    #[test]
    fn test_defaults_apply() {
        let config = resolve(&RawConfig::new(), &EnvSource::new(), "dev");
        assert_eq!(config.get(APP_NAME).unwrap(), Some("happy-testing".to_string()));
        assert_eq!(config.get(DB_PROVIDER).unwrap(), Some("supabase".to_string()));
        assert_eq!(config.get(SUPABASE_REGION).unwrap(), Some("us-east-1".to_string()));
        assert_eq!(config.source(APP_NAME), Some(ValueSource::Default));
        assert_eq!(config.get(VERCEL_ROOT_DIRECTORY).unwrap(), None);
    }

    #[test]
    fn test_stack_value_overrides_project_value() {
        let raw = RawConfig::new().with(APP_NAME, "demo").with_stack_value(
            "prod",
            APP_NAME,
            ConfigValue::Text("demo-live".to_string()),
        );
        let env = EnvSource::new();

        let prod = resolve(&raw, &env, "prod");
        assert_eq!(prod.get(APP_NAME).unwrap(), Some("demo-live".to_string()));
        assert_eq!(prod.source(APP_NAME), Some(ValueSource::Stack));

        let preview = resolve(&raw, &env, "preview");
        assert_eq!(preview.get(APP_NAME).unwrap(), Some("demo".to_string()));
        assert_eq!(preview.source(APP_NAME), Some(ValueSource::Project));
    }

    #[test]
    fn test_env_fallback_only_when_unset() {
        let env = EnvSource::new()
            .with("VERCEL_ORG_ID", "team_env")
            .with("VERCEL_PROJECT_ID", "prj_env");

        let config = resolve(&RawConfig::new(), &env, "dev");
        assert_eq!(config.get(VERCEL_TEAM_ID).unwrap(), Some("team_env".to_string()));
        assert_eq!(config.source(VERCEL_TEAM_ID), Some(ValueSource::Environment));
        assert_eq!(config.get(VERCEL_PROJECT_ID).unwrap(), Some("prj_env".to_string()));

        let raw = RawConfig::new().with(VERCEL_TEAM_ID, "team_cfg");
        let config = resolve(&raw, &env, "dev");
        assert_eq!(config.get(VERCEL_TEAM_ID).unwrap(), Some("team_cfg".to_string()));
    }

    #[test]
    fn test_env_fallback_is_allow_listed() {
        let env = EnvSource::new().with("SUPABASE_DB_PASSWORD", "pw");
        let config = resolve(&RawConfig::new(), &env, "dev");
        assert_eq!(config.get_secret(SUPABASE_DB_PASSWORD).unwrap(), None);
    }

    #[test]
    fn test_bool_absent_vs_explicit_false() {
        let config = resolve(&RawConfig::new(), &EnvSource::new(), "dev");
        assert_eq!(config.get_bool(MANAGE_PROJECT_SETTINGS).unwrap(), None);

        let raw = RawConfig::new().with_bool(MANAGE_PROJECT_SETTINGS, false);
        let config = resolve(&raw, &EnvSource::new(), "dev");
        assert_eq!(config.get_bool(MANAGE_PROJECT_SETTINGS).unwrap(), Some(false));

        let raw = RawConfig::new().with(MANAGE_PROJECT_SETTINGS, "TRUE");
        let config = resolve(&raw, &EnvSource::new(), "dev");
        assert_eq!(config.get_bool(MANAGE_PROJECT_SETTINGS).unwrap(), Some(true));
    }

    #[test]
    fn test_invalid_bool_fails_resolution() {
        let raw = RawConfig::new().with(MANAGE_PROJECT_SETTINGS, "yes please");
        let result = ConfigResolver::new(&raw, &EnvSource::new()).resolve(&Stack::new("dev"));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_secret_options_are_always_wrapped() {
        let raw = RawConfig::new().with(SUPABASE_DB_PASSWORD, "pw");
        let config = resolve(&raw, &EnvSource::new(), "dev");
        assert!(config.is_secret(SUPABASE_DB_PASSWORD));
        assert!(matches!(
            config.get(SUPABASE_DB_PASSWORD),
            Err(ConfigError::SecretAsPlain(_))
        ));
        assert_eq!(
            config.require_secret(SUPABASE_DB_PASSWORD).unwrap().expose(),
            "pw"
        );
    }

    #[test]
    fn test_require_names_missing_key() {
        let config = resolve(&RawConfig::new(), &EnvSource::new(), "prod");
        let err = config.require(SUPABASE_ORGANIZATION_ID).unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::MissingRequiredOption { key, stack }
                if key == SUPABASE_ORGANIZATION_ID && stack == "prod"
        ));
        assert!(err.to_string().contains("supabaseOrganizationId"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let raw = RawConfig::new()
            .with(VERCEL_IMPORT_PROJECT_ID, "")
            .with(VERCEL_FRAMEWORK, "")
            .with(SUPABASE_REGION, "")
            .with_secret(SUPABASE_DB_PASSWORD, "")
            .with_stack_value("prod", APP_NAME, ConfigValue::Text(String::new()));
        let config = resolve(&raw, &EnvSource::new(), "prod");

        assert_eq!(config.get(VERCEL_IMPORT_PROJECT_ID).unwrap(), None);
        assert_eq!(config.get(VERCEL_FRAMEWORK).unwrap(), None);
        assert_eq!(config.get_secret(SUPABASE_DB_PASSWORD).unwrap(), None);
        assert_eq!(config.get(SUPABASE_REGION).unwrap(), Some("us-east-1".to_string()));
        assert_eq!(config.source(SUPABASE_REGION), Some(ValueSource::Default));
        assert_eq!(config.source(APP_NAME), Some(ValueSource::Default));
    }

    #[test]
    fn test_empty_value_falls_through_to_env() {
        let raw = RawConfig::new().with(VERCEL_TEAM_ID, "");
        let env = EnvSource::new().with("VERCEL_ORG_ID", "team_env");
        let config = resolve(&raw, &env, "dev");
        assert_eq!(config.get(VERCEL_TEAM_ID).unwrap(), Some("team_env".to_string()));
    }

    #[test]
    fn test_plain_option_marked_secret_is_rejected() {
        let raw = RawConfig::new().with_secret(VERCEL_TEAM_ID, "team_1");
        let err = ConfigResolver::new(&raw, &EnvSource::new())
            .resolve(&Stack::new("dev"))
            .unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::InvalidValue { field, .. } if field == VERCEL_TEAM_ID
        ));
    }

    #[test]
    fn test_unknown_options_are_kept() {
        let raw = RawConfig::new().with("customFlag", "on");
        let config = resolve(&raw, &EnvSource::new(), "dev");
        assert_eq!(config.get("customFlag").unwrap(), Some("on".to_string()));
    }
}
