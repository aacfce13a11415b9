/* src/logging/mod.rs */

//!
//! Named loggers, pattern formatting and declarative reconfiguration.
//!
//! A [`Logger`] filters by [`LogLevel`] and fans records out to its
//! [`LogAppender`]s, each of which filters again and formats with a compiled
//! [`LogFormatter`]. [`bind_log_config`] ties a [`LoggerManager`] to the
//! `logs` config variable so loaded documents reconfigure logging live.

pub mod appender;
mod bridge;
pub mod define;
mod error;
mod event;
pub mod formatter;
mod level;
mod logger;
mod macros;
mod manager;
pub mod reconcile;

pub use appender::{AppenderCore, FileAppender, LogAppender, StdoutAppender};
pub use bridge::{LogBridge, install};
pub use define::{AppenderKind, LogAppenderDefine, LogDefine, LogDefines};
pub use error::LogError;
pub use event::{LogEvent, current_thread_id, elapsed_ms};
pub use formatter::{DEFAULT_PATTERN, FormatUnit, LogFormatter};
pub use level::LogLevel;
pub use logger::Logger;
pub use manager::{LoggerManager, ROOT_LOGGER};
pub use reconcile::{LOGS_KEY, LogConfigBinding, ReconcileReport, bind_log_config, reconcile};
