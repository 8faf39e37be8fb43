//! Secret values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered wherever a secret would otherwise be printed.
pub const REDACTED: &str = "[secret]";

/// A string that is never rendered by `Debug` or `Display`.
///
/// The raw text is only reachable through [`SecretString::expose`] and through
/// serialization, which the plan redacts unless explicitly asked to reveal.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_is_redacted() {
        let secret = SecretString::new("hunter2");
        assert_eq!(secret.to_string(), "[secret]");
        assert!(!format!("{:?}", secret).contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }
}
