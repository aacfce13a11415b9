/* src/document/format/toml.rs */

use super::super::DocumentError;
use super::Format;
use crate::convert::Value;

/// TOML format parser using `toml`.
pub struct Toml;

impl Format for Toml {
	fn extensions(&self) -> &'static [&'static str] {
		&["toml"]
	}

	fn parse(&self, input: &[u8]) -> Result<Value, DocumentError> {
		let s = std::str::from_utf8(input).map_err(|e| DocumentError::Parse(e.to_string()))?;
		toml::from_str(s).map_err(|e| DocumentError::Parse(e.to_string()))
	}
}
