//! Core desired-state types for stackplan.
//!
//! This crate contains:
//! - Stack identity and production classification
//! - Secret-preserving values and deferred resource references
//! - Database, hosting project and environment variable declarations
//! - The ordered plan handed to an external apply engine

pub mod database;
pub mod error;
pub mod hosting;
pub mod id;
pub mod plan;
pub mod secret;
pub mod stack;
pub mod value;
pub mod variable;

pub use error::{Error, Result};
pub use id::{ResourceName, ResourceRef};
pub use secret::SecretString;
pub use stack::Stack;
pub use value::{Fragment, Value};
