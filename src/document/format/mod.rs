/* src/document/format/mod.rs */

use std::path::Path;

use super::DocumentError;
use crate::convert::Value;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::Json;

#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "toml")]
pub use self::toml::Toml;

mod yaml;
pub use yaml::Yaml;

/// Abstract format parser that turns bytes into a document tree.
pub trait Format: Send + Sync {
	/// List of supported extensions.
	fn extensions(&self) -> &'static [&'static str];

	/// Parse the raw bytes into a tree.
	fn parse(&self, input: &[u8]) -> Result<Value, DocumentError>;
}

/// An enum wrapper for all enabled formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyFormat {
	Yaml,
	#[cfg(feature = "json")]
	Json,
	#[cfg(feature = "toml")]
	Toml,
}

impl AnyFormat {
	/// Every format compiled into this build.
	pub const ENABLED: &'static [AnyFormat] = &[
		AnyFormat::Yaml,
		#[cfg(feature = "json")]
		AnyFormat::Json,
		#[cfg(feature = "toml")]
		AnyFormat::Toml,
	];

	/// Finds the format handling `ext` (case-insensitive, without the dot).
	pub fn from_extension(ext: &str) -> Option<Self> {
		Self::ENABLED
			.iter()
			.copied()
			.find(|format| format.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
	}

	/// Picks the format from the extension of `path`.
	pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
		let ext = path
			.extension()
			.and_then(|ext| ext.to_str())
			.ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))?;
		Self::from_extension(ext).ok_or_else(|| DocumentError::UnsupportedFormat(ext.to_string()))
	}
}

impl Format for AnyFormat {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			Self::Yaml => Yaml.extensions(),
			#[cfg(feature = "json")]
			Self::Json => Json.extensions(),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.extensions(),
		}
	}

	fn parse(&self, input: &[u8]) -> Result<Value, DocumentError> {
		match self {
			Self::Yaml => Yaml.parse(input),
			#[cfg(feature = "json")]
			Self::Json => Json.parse(input),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.parse(input),
		}
	}
}
