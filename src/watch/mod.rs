/* src/watch/mod.rs */

//!
//! Live reloading of a config document.
//!
//! A [`ConfigWatcher`] follows one file on disk and re-applies it to a
//! [`Registry`](crate::config::Registry) whenever it settles after a change.
//! Listeners on the affected variables fire as usual; subscribers
//! additionally receive a [`ReloadEvent`] per reload attempt.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{ConfigError, LoadReport};

mod watcher;
mod worker;

pub use watcher::ConfigWatcher;

/// Errors raised while setting up a watcher.
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Notify error: {0}")]
	Notify(#[from] notify::Error),

	#[error("Config error: {0}")]
	Config(#[from] ConfigError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Watcher behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
	/// Quiet period a file must stay unchanged before it is reloaded.
	pub debounce: Duration,

	/// Apply the document once before watching starts.
	pub load_on_start: bool,
}

impl Default for WatchConfig {
	fn default() -> Self {
		Self {
			debounce: Duration::from_millis(500),
			load_on_start: true,
		}
	}
}

/// Outcome of one reload attempt.
#[derive(Debug, Clone)]
pub enum ReloadEvent {
	/// The document was read and applied.
	Applied { path: PathBuf, report: LoadReport },
	/// The document could not be read or parsed; variables were left as they were.
	Failed { path: PathBuf, error: String },
	/// The document disappeared; variables keep their last values.
	Removed { path: PathBuf },
}

impl ReloadEvent {
	pub fn path(&self) -> &Path {
		match self {
			Self::Applied { path, .. } | Self::Failed { path, .. } | Self::Removed { path } => path,
		}
	}
}
