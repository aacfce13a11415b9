/* src/logging/manager.rs */

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::appender::StdoutAppender;
use super::define::LogDefines;
use super::Logger;
use crate::convert::{Convert, ConvertError};

/// Name of the logger every manager starts with.
pub const ROOT_LOGGER: &str = "root";

static GLOBAL: OnceLock<Arc<LoggerManager>> = OnceLock::new();

/// Owns every named logger. Loggers are created on first request and never
/// destroyed, only deactivated.
#[derive(Debug)]
pub struct LoggerManager {
	root: Arc<Logger>,
	loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerManager {
	/// Creates a manager whose root logger writes to stdout.
	pub fn new() -> Self {
		let root = Arc::new(Logger::new(ROOT_LOGGER));
		root.add_appender(Arc::new(StdoutAppender::new()));

		let mut loggers = HashMap::new();
		loggers.insert(ROOT_LOGGER.to_string(), Arc::clone(&root));
		Self {
			root,
			loggers: RwLock::new(loggers),
		}
	}

	/// The process-wide manager, created on first use.
	pub fn global() -> &'static Arc<LoggerManager> {
		GLOBAL.get_or_init(|| Arc::new(LoggerManager::new()))
	}

	pub fn root(&self) -> &Arc<Logger> {
		&self.root
	}

	/// Returns the logger named `name`, creating it if needed.
	pub fn get(&self, name: &str) -> Arc<Logger> {
		if let Some(logger) = self.loggers.read().get(name) {
			return Arc::clone(logger);
		}

		let mut created = false;
		let logger = {
			let mut loggers = self.loggers.write();
			let logger = loggers.entry(name.to_string()).or_insert_with(|| {
				created = true;
				Arc::new(Logger::with_fallback(name, Arc::clone(&self.root)))
			});
			Arc::clone(logger)
		};

		// Logged after the map lock is released; the `log` bridge reads it.
		if created {
			log::debug!("creating logger {}", name);
		}
		logger
	}

	/// Returns the logger named `name` without creating it.
	pub fn find(&self, name: &str) -> Option<Arc<Logger>> {
		self.loggers.read().get(name).cloned()
	}

	/// Logger names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
		names.sort();
		names
	}

	/// Describes every logger in the declarative `logs` shape.
	pub fn to_defines(&self) -> LogDefines {
		let loggers: Vec<Arc<Logger>> = self.loggers.read().values().cloned().collect();
		loggers.iter().map(|logger| logger.to_define()).collect()
	}

	/// Renders [`to_defines`](Self::to_defines) as YAML.
	pub fn to_text(&self) -> Result<String, ConvertError> {
		self.to_defines().to_text()
	}
}

impl Default for LoggerManager {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::logging::LogLevel;

	#[test]
	fn test_root_has_stdout_appender() {
		let manager = LoggerManager::new();
		assert_eq!(manager.root().name(), ROOT_LOGGER);
		assert_eq!(manager.root().appender_count(), 1);
		assert!(Arc::ptr_eq(manager.root(), &manager.get(ROOT_LOGGER)));
	}

	#[test]
	fn test_get_creates_once() {
		let manager = LoggerManager::new();
		assert!(manager.find("system").is_none());
		let a = manager.get("system");
		let b = manager.get("system");
		assert!(Arc::ptr_eq(&a, &b));
		assert_eq!(manager.names(), vec!["root", "system"]);
	}

	#[test]
	fn test_export_lists_every_logger() {
		let manager = LoggerManager::new();
		manager.get("system").set_level(LogLevel::Warn);

		let defines = manager.to_defines();
		assert_eq!(defines.len(), 2);
		assert_eq!(defines.get("system").unwrap().level, Some(LogLevel::Warn));
		assert!(defines.get("system").unwrap().appenders.is_empty());

		let text = manager.to_text().unwrap();
		assert!(text.contains("StdoutLogAppender"));
	}
}
