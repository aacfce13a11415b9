/* src/config/mod.rs */

//!
//! Typed configuration variables, the registry that owns them, and loading of
//! hierarchical documents into it.
//!
//! - [`ConfigVar`] - A named, typed, observable value.
//! - [`Registry`] - Name-indexed store with type-checked lookup.
//! - [`flatten`] / [`Registry::load_document`] - Dotted-path document loading.

mod error;
mod loader;
mod registry;
mod var;

pub use error::ConfigError;
pub use loader::{LeafEntry, LoadReport, flatten};
pub use registry::{Registry, is_valid_name, normalize_name};
pub use var::{ConfigValue, ConfigVar, ConfigVarBase, Listener};
