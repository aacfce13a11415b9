/* src/lib.rs */

//!
//! A typed, observable configuration registry driving a reconfigurable
//! logging pipeline.
//!
//! - **convert**: two-way conversion between typed values and the YAML tree.
//! - **config**: named config variables with change listeners, the registry
//!   that owns them, and the loader that applies documents to it.
//! - **document**: format-agnostic document parsing (YAML, JSON, TOML).
//! - **logging**: loggers, appenders, pattern formatters and the
//!   reconciliation loop that follows the `logs` config variable.
//! - **watch**: live reloading of a config file into the registry.
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `json`, `toml`: Additional document formats (YAML is always available).
//! - `watch`: Enables the `watch` module (`notify` + `tokio`).
//!
//! ## Basic Usage
//!
//! See `demos/basic.rs` for a complete example.

pub mod config;
pub mod convert;
pub mod document;
pub mod logging;

#[cfg(feature = "watch")]
pub mod watch;

pub use config::{ConfigError, ConfigVar, ConfigVarBase, LoadReport, Registry};
pub use convert::{Convert, ConvertError};
pub use logging::{LogLevel, Logger, LoggerManager, bind_log_config};

#[cfg(feature = "watch")]
pub use watch::{ConfigWatcher, WatchConfig};
