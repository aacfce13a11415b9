/* src/logging/error.rs */

/// Errors raised by the logging pipeline.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
	/// The pattern has an unterminated `{`, an unknown directive or an
	/// invalid timestamp sub-pattern.
	#[error("invalid log pattern {pattern:?}")]
	PatternSyntax { pattern: String },

	/// An appender could not write to its sink.
	#[error("sink write failed: {0}")]
	SinkWrite(#[from] std::io::Error),

	/// A logger or appender definition is incomplete or inconsistent.
	#[error("invalid logger definition: {0}")]
	InvalidDefine(String),

	#[error("unknown log level {0:?}")]
	UnknownLevel(String),
}
