/* src/logging/formatter.rs */

//!
//! Compilation of log patterns into format units.
//!
//! A pattern is literal text mixed with `%` directives:
//!
//! | Directive | Output |
//! |-----------|--------|
//! | `%m` | message |
//! | `%p` | level |
//! | `%r` | milliseconds since start |
//! | `%c` | logger name |
//! | `%t` | thread id |
//! | `%n` | newline |
//! | `%d{fmt}` | local time, `fmt` in strftime syntax (default `%Y-%m-%d %H:%M:%S`) |
//! | `%f` | source file |
//! | `%l` | source line |
//! | `%T` | tab |
//! | `%F` | task id |
//! | `%N` | thread name |
//! | `%%` | literal `%` |
//!
//! Malformed input never aborts compilation. It degrades to an inline marker
//! and sets the formatter's error flag, which loggers and appenders check
//! before installing a formatter.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

use super::{LogError, LogEvent, LogLevel};

/// Pattern used by loggers that were never given one.
pub const DEFAULT_PATTERN: &str = "%d{%Y-%m-%d %H:%M:%S}%T%t%T%N%T%F%T[%p]%T[%c]%T%f:%l%T%m%n";

/// Timestamp format used by `%d` without an argument.
pub const DEFAULT_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

const PATTERN_ERROR: &str = "<<pattern_error>>";

/// One executable piece of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatUnit {
	Literal(String),
	Message,
	Level,
	Elapsed,
	LoggerName,
	ThreadId,
	NewLine,
	DateTime(String),
	File,
	Line,
	Tab,
	TaskId,
	ThreadName,
}

impl FormatUnit {
	fn render(&self, out: &mut String, logger: &str, level: LogLevel, event: &LogEvent) {
		// Writing into a String only fails if a Display impl does.
		let _ = match self {
			Self::Literal(text) => {
				out.push_str(text);
				Ok(())
			}
			Self::Message => {
				out.push_str(event.message());
				Ok(())
			}
			Self::Level => {
				out.push_str(level.as_str());
				Ok(())
			}
			Self::Elapsed => write!(out, "{}", event.elapsed()),
			Self::LoggerName => {
				out.push_str(logger);
				Ok(())
			}
			Self::ThreadId => write!(out, "{}", event.thread_id()),
			Self::NewLine => {
				out.push('\n');
				Ok(())
			}
			Self::DateTime(format) => {
				let time: DateTime<Local> = event.time().into();
				write!(out, "{}", time.format(format))
			}
			Self::File => {
				out.push_str(event.file());
				Ok(())
			}
			Self::Line => write!(out, "{}", event.line()),
			Self::Tab => {
				out.push('\t');
				Ok(())
			}
			Self::TaskId => write!(out, "{}", event.task_id()),
			Self::ThreadName => {
				out.push_str(event.thread_name());
				Ok(())
			}
		};
	}
}

enum State {
	Text,
	Percent,
	Name(char),
	Arg(char, String),
}

struct Compiler {
	units: Vec<FormatUnit>,
	literal: String,
	error: bool,
}

impl Compiler {
	fn flush(&mut self) {
		if !self.literal.is_empty() {
			self.units
				.push(FormatUnit::Literal(std::mem::take(&mut self.literal)));
		}
	}

	fn marker(&mut self, text: String) {
		self.flush();
		self.units.push(FormatUnit::Literal(text));
		self.error = true;
	}

	fn directive(&mut self, name: char, arg: Option<String>) {
		let unit = match name {
			'm' => FormatUnit::Message,
			'p' => FormatUnit::Level,
			'r' => FormatUnit::Elapsed,
			'c' => FormatUnit::LoggerName,
			't' => FormatUnit::ThreadId,
			'n' => FormatUnit::NewLine,
			'd' => {
				let format = arg
					.filter(|a| !a.is_empty())
					.unwrap_or_else(|| DEFAULT_TIME_PATTERN.to_string());
				if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
					self.marker(format!("<<error_format %d{{{}}}>>", format));
					return;
				}
				FormatUnit::DateTime(format)
			}
			'f' => FormatUnit::File,
			'l' => FormatUnit::Line,
			'T' => FormatUnit::Tab,
			'F' => FormatUnit::TaskId,
			'N' => FormatUnit::ThreadName,
			other => {
				self.marker(format!("<<error_format %{}>>", other));
				return;
			}
		};
		self.flush();
		self.units.push(unit);
	}

	fn run(mut self, pattern: &str) -> LogFormatter {
		let mut state = State::Text;

		for c in pattern.chars() {
			state = match (state, c) {
				(State::Text, '%') => State::Percent,
				(State::Text, c) => {
					self.literal.push(c);
					State::Text
				}
				(State::Percent, '%') => {
					self.literal.push('%');
					State::Text
				}
				(State::Percent, c) if c.is_ascii_alphabetic() => State::Name(c),
				(State::Percent, c) => {
					self.marker("<<error_format %>>".to_string());
					self.literal.push(c);
					State::Text
				}
				(State::Name(name), '{') => State::Arg(name, String::new()),
				(State::Name(name), '%') => {
					self.directive(name, None);
					State::Percent
				}
				(State::Name(name), c) => {
					self.directive(name, None);
					self.literal.push(c);
					State::Text
				}
				(State::Arg(name, arg), '}') => {
					self.directive(name, Some(arg));
					State::Text
				}
				(State::Arg(name, mut arg), c) => {
					arg.push(c);
					State::Arg(name, arg)
				}
			};
		}

		match state {
			State::Text => self.flush(),
			State::Percent => self.marker("<<error_format %>>".to_string()),
			State::Name(name) => self.directive(name, None),
			State::Arg(..) => self.marker(PATTERN_ERROR.to_string()),
		}

		LogFormatter {
			pattern: pattern.to_string(),
			units: self.units,
			error: self.error,
		}
	}
}

/// A compiled log pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormatter {
	pattern: String,
	units: Vec<FormatUnit>,
	error: bool,
}

impl LogFormatter {
	/// Compiles `pattern`. Never fails; check [`is_error`](Self::is_error).
	pub fn new(pattern: impl Into<String>) -> Self {
		let pattern = pattern.into();
		let formatter = Compiler {
			units: Vec::new(),
			literal: String::new(),
			error: false,
		}
		.run(&pattern);

		if formatter.error {
			log::warn!("log pattern {:?} is malformed", pattern);
		}
		formatter
	}

	/// Compiles `pattern`, rejecting it when malformed.
	pub fn parse(pattern: &str) -> Result<Self, LogError> {
		let formatter = Self::new(pattern);
		if formatter.error {
			return Err(LogError::PatternSyntax {
				pattern: pattern.to_string(),
			});
		}
		Ok(formatter)
	}

	pub fn is_error(&self) -> bool {
		self.error
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn units(&self) -> &[FormatUnit] {
		&self.units
	}

	/// Renders `event` for `logger` at `level`.
	pub fn format(&self, logger: &str, level: LogLevel, event: &LogEvent) -> String {
		let mut out = String::with_capacity(event.message().len() + 64);
		self.format_into(&mut out, logger, level, event);
		out
	}

	/// Appends the rendered event to `out`.
	pub fn format_into(&self, out: &mut String, logger: &str, level: LogLevel, event: &LogEvent) {
		for unit in &self.units {
			unit.render(out, logger, level, event);
		}
	}
}

impl Default for LogFormatter {
	fn default() -> Self {
		Self::new(DEFAULT_PATTERN)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::SystemTime;

	fn event() -> LogEvent {
		LogEvent::new("a.rs", 10, "hello")
			.with_thread(4, "main")
			.with_task_id(2)
	}

	#[test]
	fn test_default_pattern_is_valid() {
		let formatter = LogFormatter::default();
		assert!(!formatter.is_error());
		assert_eq!(formatter.pattern(), DEFAULT_PATTERN);
	}

	#[test]
	fn test_directive_table() {
		let formatter = LogFormatter::new("%p|%c|%t|%N|%F|%f:%l|%m%T%%%n");
		assert!(!formatter.is_error());
		assert_eq!(
			formatter.format("root", LogLevel::Warn, &event()),
			"WARN|root|4|main|2|a.rs:10|hello\t%\n"
		);
	}

	#[test]
	fn test_timestamp_uses_local_time() {
		let now = SystemTime::now();
		let formatter = LogFormatter::new("[%d{%H:%M:%S}] %m");
		let expected = format!("[{}] hello", DateTime::<Local>::from(now).format("%H:%M:%S"));
		assert_eq!(
			formatter.format("root", LogLevel::Info, &event().with_time(now)),
			expected
		);
	}

	#[test]
	fn test_bare_timestamp_uses_default_format() {
		let formatter = LogFormatter::new("%d");
		assert_eq!(
			formatter.units(),
			&[FormatUnit::DateTime(DEFAULT_TIME_PATTERN.to_string())]
		);
	}

	#[test]
	fn test_unterminated_brace_sets_error() {
		let formatter = LogFormatter::new("%d{%Y-%m-%d");
		assert!(formatter.is_error());
		assert_eq!(
			formatter.format("root", LogLevel::Info, &event()),
			"<<pattern_error>>"
		);
		assert!(LogFormatter::parse("%d{%Y-%m-%d").is_err());
	}

	#[test]
	fn test_unknown_directive_degrades_inline() {
		let formatter = LogFormatter::new("%x-%m");
		assert!(formatter.is_error());
		assert_eq!(
			formatter.format("root", LogLevel::Info, &event()),
			"<<error_format %x>>-hello"
		);
	}

	#[test]
	fn test_stray_percent() {
		let formatter = LogFormatter::new("100% sure %");
		assert!(formatter.is_error());
		assert_eq!(
			formatter.format("root", LogLevel::Info, &event()),
			"100<<error_format %>> sure <<error_format %>>"
		);
	}

	#[test]
	fn test_invalid_time_format_is_rejected() {
		let formatter = LogFormatter::new("%d{%Q}");
		assert!(formatter.is_error());
	}

	#[test]
	fn test_adjacent_directives() {
		let formatter = LogFormatter::new("%p%m");
		assert_eq!(
			formatter.units(),
			&[FormatUnit::Level, FormatUnit::Message]
		);
	}
}
