/* src/convert/error.rs */

/// Errors raised while converting between text, trees and typed values.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
	/// A scalar could not be parsed into the target type.
	#[error("cannot parse {input:?} as {target}")]
	Parse { input: String, target: &'static str },

	/// The tree node has the wrong kind for the target type.
	#[error("expected {expected}, found {found}")]
	Shape {
		expected: &'static str,
		found: &'static str,
	},

	/// The text is not a valid YAML document.
	#[error("yaml error: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// Failure reported by a user-registered conversion.
	#[error("{0}")]
	Custom(String),
}

impl ConvertError {
	/// Parse failure of `input` into `T`.
	pub fn parse<T>(input: impl Into<String>) -> Self {
		Self::Parse {
			input: input.into(),
			target: std::any::type_name::<T>(),
		}
	}

	/// Node of the wrong kind where `expected` was required.
	pub fn shape(expected: &'static str, found: &serde_yaml::Value) -> Self {
		Self::Shape {
			expected,
			found: super::node_kind(found),
		}
	}
}
