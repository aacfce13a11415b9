/* src/document/format/yaml.rs */

use super::super::DocumentError;
use super::Format;
use crate::convert::Value;

/// YAML format parser using `serde_yaml`.
pub struct Yaml;

impl Format for Yaml {
	fn extensions(&self) -> &'static [&'static str] {
		&["yaml", "yml"]
	}

	fn parse(&self, input: &[u8]) -> Result<Value, DocumentError> {
		serde_yaml::from_slice(input).map_err(|e| DocumentError::Parse(e.to_string()))
	}
}
