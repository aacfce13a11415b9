/* src/logging/macros.rs */

/// Logs a formatted message on `logger` at `level`, capturing the call site.
///
/// The message is only formatted when the logger accepts `level`.
///
/// ```ignore
/// let logger = LoggerManager::global().get("system");
/// livelog::log_at!(logger, LogLevel::Info, "listening on {}", port);
/// ```
#[macro_export]
macro_rules! log_at {
	($logger:expr, $level:expr, $($arg:tt)+) => {{
		let logger = &$logger;
		let level: $crate::logging::LogLevel = $level;
		if logger.is_enabled(level) {
			logger.log(
				level,
				&$crate::logging::LogEvent::new(file!(), line!(), format!($($arg)+)),
			);
		}
	}};
}

#[macro_export]
macro_rules! log_debug {
	($logger:expr, $($arg:tt)+) => {
		$crate::log_at!($logger, $crate::logging::LogLevel::Debug, $($arg)+)
	};
}

#[macro_export]
macro_rules! log_info {
	($logger:expr, $($arg:tt)+) => {
		$crate::log_at!($logger, $crate::logging::LogLevel::Info, $($arg)+)
	};
}

#[macro_export]
macro_rules! log_warn {
	($logger:expr, $($arg:tt)+) => {
		$crate::log_at!($logger, $crate::logging::LogLevel::Warn, $($arg)+)
	};
}

#[macro_export]
macro_rules! log_error {
	($logger:expr, $($arg:tt)+) => {
		$crate::log_at!($logger, $crate::logging::LogLevel::Error, $($arg)+)
	};
}

#[macro_export]
macro_rules! log_fatal {
	($logger:expr, $($arg:tt)+) => {
		$crate::log_at!($logger, $crate::logging::LogLevel::Fatal, $($arg)+)
	};
}

#[cfg(test)]
mod tests {
	use crate::logging::appender::{AppenderCore, LogAppender};
	use crate::logging::define::AppenderKind;
	use crate::logging::{LogLevel, Logger};
	use parking_lot::Mutex;
	use std::io;
	use std::sync::Arc;

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
	fn test_macros_capture_call_site() {
		let logger = Arc::new(Logger::new("m"));
		logger.set_pattern("%p %f %m").unwrap();
		logger.set_level(LogLevel::Info);
		let capture = Arc::new(Capture::default());
		logger.add_appender(capture.clone());

		crate::log_debug!(logger, "hidden {}", 1);
		crate::log_info!(logger, "port {}", 80);
		crate::log_fatal!(logger, "down");

		let lines = capture.lines.lock();
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0], format!("INFO {} port 80", file!()));
		assert!(lines[1].starts_with("FATAL"));
	}
}
