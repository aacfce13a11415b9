/* src/logging/appender/mod.rs */

//!
//! Output sinks for formatted log records.

mod file;
mod stdout;

pub use file::FileAppender;
pub use stdout::StdoutAppender;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use arc_swap::ArcSwap;

use super::define::{AppenderKind, LogAppenderDefine};
use super::{LogError, LogEvent, LogFormatter, LogLevel};

/// State shared by every appender: level threshold and formatter.
///
/// An appender without a formatter of its own follows the formatter of the
/// logger it is attached to.
#[derive(Debug)]
pub struct AppenderCore {
	level: AtomicU8,
	formatter: ArcSwap<LogFormatter>,
	own_formatter: AtomicBool,
}

impl AppenderCore {
	pub fn new() -> Self {
		Self {
			level: AtomicU8::new(LogLevel::Debug as u8),
			formatter: ArcSwap::from_pointee(LogFormatter::default()),
			own_formatter: AtomicBool::new(false),
		}
	}

	pub fn level(&self) -> LogLevel {
		LogLevel::from_u8(self.level.load(Ordering::Relaxed))
	}

	pub fn set_level(&self, level: LogLevel) {
		self.level.store(level as u8, Ordering::Relaxed);
	}

	pub fn formatter(&self) -> Arc<LogFormatter> {
		self.formatter.load_full()
	}

	/// Installs an explicit formatter. Malformed formatters are rejected and
	/// the current one is kept.
	pub fn set_formatter(&self, formatter: Arc<LogFormatter>) -> Result<(), LogError> {
		if formatter.is_error() {
			return Err(LogError::PatternSyntax {
				pattern: formatter.pattern().to_string(),
			});
		}
		self.formatter.store(formatter);
		self.own_formatter.store(true, Ordering::Release);
		Ok(())
	}

	/// Adopts a logger's formatter unless an explicit one was installed.
	pub(crate) fn inherit_formatter(&self, formatter: &Arc<LogFormatter>) {
		if !self.has_own_formatter() {
			self.formatter.store(Arc::clone(formatter));
		}
	}

	pub fn has_own_formatter(&self) -> bool {
		self.own_formatter.load(Ordering::Acquire)
	}
}

impl Default for AppenderCore {
	fn default() -> Self {
		Self::new()
	}
}

/// A destination for log records.
///
/// Implementors supply the raw [`write`](LogAppender::write) and their
/// [`AppenderCore`]; filtering and formatting are provided.
pub trait LogAppender: Send + Sync {
	fn core(&self) -> &AppenderCore;

	/// Writes one already formatted record.
	fn write(&self, text: &str) -> io::Result<()>;

	/// Declarative description of the sink, used for export.
	fn kind(&self) -> AppenderKind;

	/// Formats and writes `event` when `level` passes this appender's
	/// threshold.
	fn log(&self, logger: &str, level: LogLevel, event: &LogEvent) -> Result<(), LogError> {
		if level < self.level() {
			return Ok(());
		}
		let text = self.core().formatter().format(logger, level, event);
		self.write(&text).map_err(LogError::SinkWrite)
	}

	fn level(&self) -> LogLevel {
		self.core().level()
	}

	fn set_level(&self, level: LogLevel) {
		self.core().set_level(level);
	}

	fn formatter(&self) -> Arc<LogFormatter> {
		self.core().formatter()
	}

	fn set_formatter(&self, formatter: Arc<LogFormatter>) -> Result<(), LogError> {
		self.core().set_formatter(formatter)
	}

	/// Compiles and installs `pattern`.
	fn set_pattern(&self, pattern: &str) -> Result<(), LogError> {
		self.set_formatter(Arc::new(LogFormatter::parse(pattern)?))
	}

	fn has_own_formatter(&self) -> bool {
		self.core().has_own_formatter()
	}

	fn to_define(&self) -> LogAppenderDefine {
		LogAppenderDefine {
			kind: self.kind(),
			level: Some(self.level()),
			formatter: self
				.has_own_formatter()
				.then(|| self.formatter().pattern().to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parking_lot::Mutex;

	#[derive(Default)]
	struct Capture {
		core: AppenderCore,
		lines: Mutex<Vec<String>>,
	}

	impl LogAppender for Capture {
		fn core(&self) -> &AppenderCore {
			&self.core
		}

		fn write(&self, text: &str) -> io::Result<()> {
			self.lines.lock().push(text.to_string());
			Ok(())
		}

		fn kind(&self) -> AppenderKind {
			AppenderKind::Stdout
		}
	}

	#[test]
	fn test_level_threshold_filters() {
		let appender = Capture::default();
		appender.set_formatter(Arc::new(LogFormatter::new("%p %m"))).unwrap();
		appender.set_level(LogLevel::Warn);

		let event = LogEvent::new("a.rs", 1, "hi");
		appender.log("root", LogLevel::Info, &event).unwrap();
		appender.log("root", LogLevel::Error, &event).unwrap();
		assert_eq!(*appender.lines.lock(), vec!["ERROR hi"]);
	}

	#[test]
	fn test_malformed_formatter_is_rejected() {
		let appender = Capture::default();
		let before = appender.formatter();
		assert!(
			appender
				.set_formatter(Arc::new(LogFormatter::new("%d{%H")))
				.is_err()
		);
		assert!(Arc::ptr_eq(&before, &appender.formatter()));
		assert!(!appender.has_own_formatter());
	}

	#[test]
	fn test_own_formatter_is_not_overridden() {
		let appender = Capture::default();
		let inherited = Arc::new(LogFormatter::new("%m"));
		appender.core().inherit_formatter(&inherited);
		assert_eq!(appender.formatter().pattern(), "%m");
		assert!(appender.to_define().formatter.is_none());

		appender.set_formatter(Arc::new(LogFormatter::new("%p"))).unwrap();
		appender.core().inherit_formatter(&inherited);
		assert_eq!(appender.formatter().pattern(), "%p");
		assert_eq!(appender.to_define().formatter.as_deref(), Some("%p"));
	}
}
