/* src/logging/bridge.rs */

//!
//! Routes records from the `log` facade into a [`LoggerManager`].

use std::borrow::Cow;
use std::cell::Cell;
use std::sync::Arc;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use super::{LogEvent, LogLevel, Logger, LoggerManager};

thread_local! {
	static IN_BRIDGE: Cell<bool> = const { Cell::new(false) };
}

/// `log::Log` implementation backed by a [`LoggerManager`].
///
/// A record goes to the logger named by its target, then to the nearest
/// `::`-separated parent that exists, then to `root`. Records emitted while
/// another record is being written on the same thread go to stderr.
#[derive(Debug)]
pub struct LogBridge {
	manager: Arc<LoggerManager>,
}

impl LogBridge {
	pub fn new(manager: Arc<LoggerManager>) -> Self {
		Self { manager }
	}

	fn route(&self, target: &str) -> Arc<Logger> {
		let mut path = target;
		loop {
			if let Some(logger) = self.manager.find(path) {
				return logger;
			}
			match path.rfind("::") {
				Some(idx) => path = &path[..idx],
				None => return Arc::clone(self.manager.root()),
			}
		}
	}
}

impl log::Log for LogBridge {
	fn enabled(&self, metadata: &Metadata<'_>) -> bool {
		self.route(metadata.target())
			.is_enabled(LogLevel::from(metadata.level()))
	}

	fn log(&self, record: &Record<'_>) {
		let level = LogLevel::from(record.level());
		let logger = self.route(record.target());
		if !logger.is_enabled(level) {
			return;
		}

		if IN_BRIDGE.with(|busy| busy.replace(true)) {
			eprintln!("[{}] {}: {}", level, record.target(), record.args());
			return;
		}

		let file = match record.file_static() {
			Some(file) => Cow::Borrowed(file),
			None => Cow::Owned(record.file().unwrap_or_default().to_string()),
		};
		let event = LogEvent::new(file, record.line().unwrap_or(0), record.args().to_string());
		logger.log(level, &event);

		IN_BRIDGE.with(|busy| busy.set(false));
	}

	fn flush(&self) {}
}

/// Installs a [`LogBridge`] as the global `log` logger.
pub fn install(manager: Arc<LoggerManager>) -> Result<(), SetLoggerError> {
	log::set_boxed_logger(Box::new(LogBridge::new(manager)))?;
	log::set_max_level(LevelFilter::Trace);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_route_walks_module_path() {
		let manager = Arc::new(LoggerManager::new());
		let config = manager.get("livelog::config");
		let bridge = LogBridge::new(manager.clone());

		assert!(Arc::ptr_eq(&bridge.route("livelog::config::registry"), &config));
		assert!(Arc::ptr_eq(&bridge.route("livelog::config"), &config));
		assert!(Arc::ptr_eq(&bridge.route("other"), manager.root()));
	}

	#[test]
	fn test_enabled_follows_logger_level() {
		let manager = Arc::new(LoggerManager::new());
		manager.get("quiet").set_level(LogLevel::Error);
		let bridge = LogBridge::new(manager);

		let warn = Metadata::builder().target("quiet").level(log::Level::Warn).build();
		let error = Metadata::builder().target("quiet").level(log::Level::Error).build();
		assert!(!log::Log::enabled(&bridge, &warn));
		assert!(log::Log::enabled(&bridge, &error));
	}
}
