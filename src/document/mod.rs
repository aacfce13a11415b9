/* src/document/mod.rs */

//!
//! Format-agnostic parsing of config documents into a single tree type.
//!
//! YAML is always available; JSON and TOML are enabled by the `json` and
//! `toml` features. Every format yields a [`Value`], so the loader never
//! needs to know where a document came from.

mod error;
pub mod format;

pub use error::DocumentError;
pub use format::{AnyFormat, Format};

use std::path::Path;

use crate::convert::Value;

/// Parses YAML bytes.
pub fn parse_yaml(input: &[u8]) -> Result<Value, DocumentError> {
	format::Yaml.parse(input)
}

/// Reads and parses a document, selecting the parser by file extension.
pub fn read_path(path: &Path) -> Result<Value, DocumentError> {
	let format = AnyFormat::from_path(path)?;
	let bytes = std::fs::read(path)?;
	let root = format.parse(&bytes)?;
	log::debug!("parsed {:?} document {}", format, path.display());
	Ok(root)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_yaml_always_enabled() {
		assert_eq!(AnyFormat::from_extension("YML"), Some(AnyFormat::Yaml));
		assert_eq!(
			AnyFormat::from_path(Path::new("conf/app.yaml")).unwrap(),
			AnyFormat::Yaml
		);
	}

	#[test]
	fn test_unknown_extension_is_rejected() {
		assert!(matches!(
			AnyFormat::from_path(Path::new("app.ini")),
			Err(DocumentError::UnsupportedFormat(_))
		));
		assert!(AnyFormat::from_path(Path::new("Makefile")).is_err());
	}

	#[test]
	fn test_parse_error_is_reported() {
		assert!(matches!(
			parse_yaml(b"key: [unclosed"),
			Err(DocumentError::Parse(_))
		));
	}

	#[cfg(feature = "json")]
	#[test]
	fn test_json_yields_same_tree() {
		let json = AnyFormat::Json.parse(br#"{"system": {"port": 80}}"#).unwrap();
		let yaml = parse_yaml(b"system:\n  port: 80\n").unwrap();
		assert_eq!(json, yaml);
	}

	#[cfg(feature = "toml")]
	#[test]
	fn test_toml_yields_same_tree() {
		let toml = AnyFormat::Toml.parse(b"[system]\nport = 80\n").unwrap();
		let yaml = parse_yaml(b"system:\n  port: 80\n").unwrap();
		assert_eq!(toml, yaml);
	}
}
