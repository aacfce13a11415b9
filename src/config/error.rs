/* src/config/error.rs */

use crate::convert::ConvertError;
use crate::document::DocumentError;

/// Errors raised by the config registry and document loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The name contains characters outside `[a-z0-9._]` or is empty.
	#[error("invalid config name: {name:?}")]
	InvalidName { name: String },

	/// The name is already registered with a different value type.
	#[error("config {name} is registered as {actual}, requested as {expected}")]
	TypeMismatch {
		name: String,
		expected: &'static str,
		actual: &'static str,
	},

	#[error("conversion error: {0}")]
	Convert(#[from] ConvertError),

	#[error("document error: {0}")]
	Document(#[from] DocumentError),
}
