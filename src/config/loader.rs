/* src/config/loader.rs */

//!
//! Flattening of hierarchical documents into dotted config keys, and
//! application of those keys to registered variables.

use std::path::Path;

use serde_yaml::Mapping;

use super::registry::{Registry, is_valid_name, normalize_name};
use super::ConfigError;
use crate::convert::{Value, node_to_text};
use crate::document;

/// A visited document node paired with its dotted, lowercased path.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafEntry<'a> {
	pub key: String,
	pub node: &'a Value,
}

/// Outcome of applying a document to a registry.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
	/// Keys whose variable changed value.
	pub updated: Vec<String>,
	/// Keys whose variable already held the loaded value.
	pub unchanged: Vec<String>,
	/// Paths skipped because they are not valid config names.
	pub invalid: Vec<String>,
	/// Keys whose node could not be converted (value kept).
	pub failed: Vec<(String, String)>,
}

impl LoadReport {
	/// Returns an iterator over every key that matched a registered variable.
	pub fn applied(&self) -> impl Iterator<Item = &String> {
		self.updated.iter().chain(self.unchanged.iter())
	}

	/// True when nothing was skipped or rejected.
	pub fn is_clean(&self) -> bool {
		self.invalid.is_empty() && self.failed.is_empty()
	}
}

/// Walks `root` and returns every node below it with its dotted path, in
/// discovery order.
///
/// Mapping nodes are emitted and then descended into; sequences and scalars
/// end the walk. Paths are lowercased, and a path that is not a valid config
/// name is skipped together with its subtree.
pub fn flatten(root: &Value) -> Vec<LeafEntry<'_>> {
	flatten_with_invalid(root).0
}

fn flatten_with_invalid(root: &Value) -> (Vec<LeafEntry<'_>>, Vec<String>) {
	let mut entries = Vec::new();
	let mut invalid = Vec::new();
	if let Value::Mapping(children) = root {
		walk_children("", children, &mut entries, &mut invalid);
	}
	(entries, invalid)
}

fn walk_children<'a>(
	prefix: &str,
	children: &'a Mapping,
	entries: &mut Vec<LeafEntry<'a>>,
	invalid: &mut Vec<String>,
) {
	for (key, node) in children {
		let segment = match key {
			Value::String(_) | Value::Number(_) | Value::Bool(_) => node_to_text(key),
			other => {
				log::warn!("skipping non-scalar document key under {:?}: {:?}", prefix, other);
				continue;
			}
		};

		let path = if prefix.is_empty() {
			normalize_name(&segment)
		} else {
			format!("{}.{}", prefix, normalize_name(&segment))
		};

		if !is_valid_name(&path) {
			log::error!("config key {:?} is invalid, skipping it", path);
			invalid.push(path);
			continue;
		}

		entries.push(LeafEntry {
			key: path.clone(),
			node,
		});

		if let Value::Mapping(grandchildren) = node {
			walk_children(&path, grandchildren, entries, invalid);
		}
	}
}

impl Registry {
	/// Applies every flattened entry of `root` to the matching registered
	/// variable, in discovery order. Unknown keys are ignored; a failed
	/// conversion keeps the variable's value and does not stop the load.
	pub fn load_document(&self, root: &Value) -> LoadReport {
		let (entries, invalid) = flatten_with_invalid(root);
		let mut report = LoadReport {
			invalid,
			..LoadReport::default()
		};

		for LeafEntry { key, node } in entries {
			let Some(var) = self.lookup_base(&key) else {
				continue;
			};

			match var.from_node(node) {
				Ok(true) => report.updated.push(key),
				Ok(false) => report.unchanged.push(key),
				Err(e) => report.failed.push((key, e.to_string())),
			}
		}

		log::debug!(
			"document applied: {} updated, {} unchanged, {} invalid, {} failed",
			report.updated.len(),
			report.unchanged.len(),
			report.invalid.len(),
			report.failed.len()
		);
		report
	}

	/// Parses `text` as YAML and applies it.
	pub fn load_yaml_str(&self, text: &str) -> Result<LoadReport, ConfigError> {
		let root = document::parse_yaml(text.as_bytes())?;
		Ok(self.load_document(&root))
	}

	/// Reads a document from disk, picking the format by extension, and
	/// applies it.
	pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadReport, ConfigError> {
		let root = document::read_path(path.as_ref())?;
		Ok(self.load_document(&root))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn doc(text: &str) -> Value {
		serde_yaml::from_str(text).unwrap()
	}

	#[test]
	fn test_flatten_emits_maps_and_leaves_in_order() {
		let root = doc("system:\n  port: 80\n  hosts: [a, b]\nlogs: []\n");
		let keys: Vec<_> = flatten(&root).into_iter().map(|e| e.key).collect();
		assert_eq!(keys, vec!["system", "system.port", "system.hosts", "logs"]);
	}

	#[test]
	fn test_flatten_stops_at_sequences() {
		let root = doc("list:\n  - inner: 1\n");
		let entries = flatten(&root);
		assert_eq!(entries.len(), 1);
		assert!(entries[0].node.is_sequence());
	}

	#[test]
	fn test_flatten_lowercases_and_skips_invalid_subtrees() {
		let root = doc("System:\n  Port: 80\nbad-key:\n  child: 1\n");
		let (entries, invalid) = flatten_with_invalid(&root);
		let keys: Vec<_> = entries.into_iter().map(|e| e.key).collect();
		assert_eq!(keys, vec!["system", "system.port"]);
		assert_eq!(invalid, vec!["bad-key"]);
	}

	#[test]
	fn test_non_mapping_root_is_empty() {
		assert!(flatten(&doc("[1, 2]")).is_empty());
		assert!(flatten(&Value::Null).is_empty());
	}

	#[test]
	fn test_load_document_reports_outcomes() {
		let registry = Registry::new();
		let port = registry.lookup_or_create("system.port", 8080u16, "").unwrap();
		registry.lookup_or_create("system.name", String::from("voyager"), "").unwrap();
		registry.lookup_or_create("system.retries", 3u8, "").unwrap();

		let report = registry
			.load_yaml_str("system:\n  port: 80\n  name: voyager\n  retries: lots\n  Bad!: 1\n")
			.unwrap();

		assert_eq!(port.value(), 80);
		assert_eq!(report.updated, vec!["system.port"]);
		assert_eq!(report.unchanged, vec!["system.name"]);
		assert_eq!(report.failed.len(), 1);
		assert_eq!(report.failed[0].0, "system.retries");
		assert_eq!(report.invalid, vec!["system.bad!"]);
		assert!(!report.is_clean());
		assert_eq!(
			registry.lookup::<u8>("system.retries").unwrap().value(),
			3
		);
	}

	#[test]
	fn test_last_applied_wins_on_case_collision() {
		let registry = Registry::new();
		let level = registry.lookup_or_create("app.level", String::new(), "").unwrap();

		registry.load_yaml_str("app:\n  level: debug\n  LEVEL: warn\n").unwrap();
		assert_eq!(level.value(), "warn");
	}

	#[test]
	fn test_subtree_applied_to_container_variable() {
		let registry = Registry::new();
		let hosts = registry
			.lookup_or_create("db.hosts", vec![String::from("localhost")], "")
			.unwrap();

		registry.load_yaml_str("db:\n  hosts:\n    - a.internal\n    - b.internal\n").unwrap();
		assert_eq!(hosts.value(), vec!["a.internal", "b.internal"]);
	}
}
