/* src/logging/logger.rs */

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use arc_swap::ArcSwap;
use parking_lot::RwLock;

use super::appender::LogAppender;
use super::define::LogDefine;
use super::formatter::DEFAULT_PATTERN;
use super::{LogError, LogEvent, LogFormatter, LogLevel};

/// A named log channel fanning records out to its appenders.
///
/// A logger without appenders hands records to its fallback (the root
/// logger for loggers created by a [`LoggerManager`](super::LoggerManager)),
/// still tagged with its own name.
pub struct Logger {
	name: String,
	level: AtomicU8,
	formatter: ArcSwap<LogFormatter>,
	appenders: RwLock<Vec<Arc<dyn LogAppender>>>,
	fallback: Option<Arc<Logger>>,
}

impl Logger {
	/// Creates a standalone logger at the most verbose level.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			level: AtomicU8::new(LogLevel::Debug as u8),
			formatter: ArcSwap::from_pointee(LogFormatter::default()),
			appenders: RwLock::new(Vec::new()),
			fallback: None,
		}
	}

	pub(crate) fn with_fallback(name: impl Into<String>, fallback: Arc<Logger>) -> Self {
		Self {
			fallback: Some(fallback),
			..Self::new(name)
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn level(&self) -> LogLevel {
		LogLevel::from_u8(self.level.load(Ordering::Relaxed))
	}

	pub fn set_level(&self, level: LogLevel) {
		self.level.store(level as u8, Ordering::Relaxed);
	}

	pub fn is_enabled(&self, level: LogLevel) -> bool {
		level != LogLevel::Off && level >= self.level()
	}

	pub fn formatter(&self) -> Arc<LogFormatter> {
		self.formatter.load_full()
	}

	/// Installs the default formatter and hands it to every appender that
	/// has none of its own. A malformed formatter is rejected and the
	/// current one kept.
	pub fn set_formatter(&self, formatter: Arc<LogFormatter>) -> Result<(), LogError> {
		if formatter.is_error() {
			log::error!(
				"logger {}: rejecting malformed pattern {:?}",
				self.name,
				formatter.pattern()
			);
			return Err(LogError::PatternSyntax {
				pattern: formatter.pattern().to_string(),
			});
		}

		let appenders = self.appenders.read();
		self.formatter.store(Arc::clone(&formatter));
		for appender in appenders.iter() {
			appender.core().inherit_formatter(&formatter);
		}
		Ok(())
	}

	/// Compiles and installs `pattern` as the default formatter.
	pub fn set_pattern(&self, pattern: &str) -> Result<(), LogError> {
		self.set_formatter(Arc::new(LogFormatter::new(pattern)))
	}

	/// Attaches an appender. It adopts the logger's formatter unless it
	/// already has one of its own.
	pub fn add_appender(&self, appender: Arc<dyn LogAppender>) {
		let mut appenders = self.appenders.write();
		appender.core().inherit_formatter(&self.formatter.load_full());
		appenders.push(appender);
	}

	/// Detaches `appender`. Returns whether it was attached.
	pub fn remove_appender(&self, appender: &Arc<dyn LogAppender>) -> bool {
		let mut appenders = self.appenders.write();
		let before = appenders.len();
		appenders.retain(|a| !Arc::ptr_eq(a, appender));
		appenders.len() != before
	}

	pub fn clear_appenders(&self) {
		self.appenders.write().clear();
	}

	/// Snapshot of the attached appenders.
	pub fn appenders(&self) -> Vec<Arc<dyn LogAppender>> {
		self.appenders.read().clone()
	}

	pub fn appender_count(&self) -> usize {
		self.appenders.read().len()
	}

	/// Sends `event` to every appender when `level` passes the threshold.
	/// Sink failures are reported and never stop the other appenders.
	pub fn log(&self, level: LogLevel, event: &LogEvent) {
		self.dispatch(&self.name, level, event);
	}

	fn dispatch(&self, name: &str, level: LogLevel, event: &LogEvent) {
		if !self.is_enabled(level) {
			return;
		}

		let appenders = self.appenders();
		if appenders.is_empty() {
			if let Some(fallback) = &self.fallback {
				fallback.dispatch(name, level, event);
			}
			return;
		}

		for appender in &appenders {
			if let Err(e) = appender.log(name, level, event) {
				log::error!("logger {}: appender failed: {}", name, e);
			}
		}
	}

	pub fn debug(&self, event: &LogEvent) {
		self.log(LogLevel::Debug, event);
	}

	pub fn info(&self, event: &LogEvent) {
		self.log(LogLevel::Info, event);
	}

	pub fn warn(&self, event: &LogEvent) {
		self.log(LogLevel::Warn, event);
	}

	pub fn error(&self, event: &LogEvent) {
		self.log(LogLevel::Error, event);
	}

	pub fn fatal(&self, event: &LogEvent) {
		self.log(LogLevel::Fatal, event);
	}

	/// Describes the logger in the declarative `logs` shape.
	pub fn to_define(&self) -> LogDefine {
		let formatter = self.formatter();
		LogDefine {
			name: self.name.clone(),
			level: Some(self.level()),
			formatter: (formatter.pattern() != DEFAULT_PATTERN).then(|| formatter.pattern().to_string()),
			appenders: self.appenders().iter().map(|a| a.to_define()).collect(),
		}
	}
}

impl fmt::Debug for Logger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Logger")
			.field("name", &self.name)
			.field("level", &self.level())
			.field("pattern", &self.formatter().pattern())
			.field("appenders", &self.appender_count())
			.finish()
	}
}
