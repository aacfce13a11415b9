/* src/document/error.rs */

/// Errors raised while reading or parsing a config document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
	/// Parsing error from the format implementation.
	#[error("parse error: {0}")]
	Parse(String),

	/// No enabled format handles this file extension.
	#[error("unsupported document format: {0:?}")]
	UnsupportedFormat(String),

	/// IO error while reading the document.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}
