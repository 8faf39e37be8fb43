//! Values that may carry secrets or references resolved at apply time.
//!
//! A [`Value`] is an ordered list of fragments. Literal text, secrets and
//! deferred references can be mixed, and a value containing any secret stays
//! secret: formatting it never reveals the secret text.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::id::ResourceRef;
use crate::secret::{REDACTED, SecretString};

/// A segment of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    /// Plain text.
    Literal(String),
    /// Secret text, redacted in every rendering.
    Secret(SecretString),
    /// `${resource.attribute}` resolved by the apply engine.
    #[serde(rename = "ref")]
    Reference(ResourceRef),
}

/// A possibly-secret, possibly-deferred string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    fragments: Vec<Fragment>,
    secret: bool,
}

impl Value {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::from_fragments(vec![Fragment::Literal(text.into())])
    }

    pub fn secret(secret: SecretString) -> Self {
        Self::from_fragments(vec![Fragment::Secret(secret)])
    }

    pub fn reference(reference: ResourceRef) -> Self {
        Self::from_fragments(vec![Fragment::Reference(reference)])
    }

    /// Build a value, merging adjacent literals and dropping empty ones.
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let mut merged: Vec<Fragment> = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            match fragment {
                Fragment::Literal(text) if text.is_empty() => {}
                Fragment::Literal(text) => {
                    if let Some(Fragment::Literal(prev)) = merged.last_mut() {
                        prev.push_str(&text);
                    } else {
                        merged.push(Fragment::Literal(text));
                    }
                }
                other => merged.push(other),
            }
        }
        let secret = merged.iter().any(|f| matches!(f, Fragment::Secret(_)));
        Self {
            fragments: merged,
            secret,
        }
    }

    /// Mark the whole value as secret (e.g. a provider-issued connection URI).
    /// A plain literal becomes a secret fragment.
    pub fn into_secret(mut self) -> Self {
        if let [Fragment::Literal(text)] = self.fragments.as_mut_slice() {
            let text = std::mem::take(text);
            self.fragments = vec![Fragment::Secret(SecretString::new(text))];
        }
        self.secret = true;
        self
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Deferred references contained in this value, in order.
    pub fn references(&self) -> impl Iterator<Item = &ResourceRef> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Reference(r) => Some(r),
            _ => None,
        })
    }

    /// The text of a non-secret value made of a single literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self.fragments.as_slice() {
            [Fragment::Literal(text)] if !self.secret => Some(text),
            [] if !self.secret => Some(""),
            _ => None,
        }
    }

    /// Render the value with secrets exposed and references as `${...}`.
    ///
    /// Only meant for handing the value to something that needs the raw text.
    pub fn expose(&self) -> String {
        self.fragments
            .iter()
            .map(|f| match f {
                Fragment::Literal(text) => text.clone(),
                Fragment::Secret(secret) => secret.expose().to_string(),
                Fragment::Reference(r) => format!("${{{}}}", r),
            })
            .collect()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.secret {
            return f.write_str(REDACTED);
        }
        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(text) => f.write_str(text)?,
                Fragment::Secret(_) => f.write_str(REDACTED)?,
                Fragment::Reference(r) => write!(f, "${{{}}}", r)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::literal(text)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(text) = self.as_literal() {
            return serializer.serialize_str(text);
        }
        let mut state = serializer.serialize_struct("Value", 2)?;
        state.serialize_field("secret", &self.secret)?;
        state.serialize_field("parts", &self.fragments)?;
        state.end()
    }
}
