/* src/document/format/json.rs */

use super::super::DocumentError;
use super::Format;
use crate::convert::Value;

/// JSON format parser using `serde_json`.
pub struct Json;

impl Format for Json {
	fn extensions(&self) -> &'static [&'static str] {
		&["json"]
	}

	fn parse(&self, input: &[u8]) -> Result<Value, DocumentError> {
		serde_json::from_slice(input).map_err(|e| DocumentError::Parse(e.to_string()))
	}
}
