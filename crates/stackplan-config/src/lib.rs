//! KDL stack configuration for stackplan.
//!
//! This crate handles:
//! - Parsing project-wide and stack-scoped values from KDL
//! - Environment fallbacks for platform identity fields
//! - Typed, secret-aware lookups with defaults
//! - Secret-preserving `${...}` interpolation

pub mod error;
pub mod interpolate;
pub mod options;
pub mod resolver;
pub mod source;

pub use error::{ConfigError, ConfigResult};
pub use interpolate::Interpolation;
pub use resolver::{Config, ConfigResolver, ValueSource};
pub use source::{ConfigValue, EnvSource, RawConfig};
