//! Secret-preserving variable interpolation.
//!
//! Templates use `${name}` or `${namespace.name}` placeholders:
//! - `${password}` - bound to a secret, result stays secret
//! - `${project.id}` - bound to a reference the apply engine resolves
//! - `${region}` - bound to plain text
//!
//! Unbound placeholders are kept verbatim. Interpolation is the only way a
//! secret is combined with template text, and the combined value is secret.

use regex::Regex;
use stackplan_core::{Fragment, ResourceRef, SecretString, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Regex for matching ${...} placeholders
static VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)?)\}")
        .expect("placeholder pattern is valid")
});

/// Named bindings for template placeholders.
#[derive(Debug, Clone, Default)]
pub struct Interpolation {
    bindings: BTreeMap<String, Fragment>,
}

impl Interpolation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_literal(mut self, name: &str, text: impl Into<String>) -> Self {
        self.bindings
            .insert(name.to_string(), Fragment::Literal(text.into()));
        self
    }

    pub fn bind_secret(mut self, name: &str, secret: SecretString) -> Self {
        self.bindings
            .insert(name.to_string(), Fragment::Secret(secret));
        self
    }

    pub fn bind_reference(mut self, name: &str, reference: ResourceRef) -> Self {
        self.bindings
            .insert(name.to_string(), Fragment::Reference(reference));
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&Fragment> {
        self.bindings.get(name)
    }

    /// Interpolate all placeholders in a template.
    pub fn interpolate(&self, template: &str) -> Value {
        let mut fragments = Vec::new();
        let mut last = 0;

        for caps in VAR_REGEX.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            fragments.push(Fragment::Literal(template[last..whole.start()].to_string()));
            match self.resolve(name.as_str()) {
                Some(fragment) => fragments.push(fragment.clone()),
                None => fragments.push(Fragment::Literal(whole.as_str().to_string())),
            }
            last = whole.end();
        }
        fragments.push(Fragment::Literal(template[last..].to_string()));

        Value::from_fragments(fragments)
    }
}
