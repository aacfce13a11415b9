/* src/convert/collection.rs */

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::{BuildHasher, Hash};

use serde_yaml::Mapping;

use super::{Convert, ConvertError, Value, node_to_text};

/// Elements of a sequence node. Null is an empty sequence.
fn sequence_items(node: &Value) -> Result<&[Value], ConvertError> {
	match node {
		Value::Sequence(items) => Ok(items),
		Value::Null => Ok(&[]),
		other => Err(ConvertError::shape("sequence", other)),
	}
}

fn to_sequence<'a, T, I>(items: I) -> Result<Value, ConvertError>
where
	T: Convert + 'a,
	I: IntoIterator<Item = &'a T>,
{
	items
		.into_iter()
		.map(Convert::to_node)
		.collect::<Result<Vec<_>, _>>()
		.map(Value::Sequence)
}

fn from_sequence<T, C>(node: &Value) -> Result<C, ConvertError>
where
	T: Convert,
	C: FromIterator<T>,
{
	sequence_items(node)?.iter().map(T::from_node).collect()
}

/// Entries of a mapping node with keys rendered as text. Null is an empty map.
fn mapping_entries(node: &Value) -> Result<Vec<(String, &Value)>, ConvertError> {
	let mapping = match node {
		Value::Mapping(mapping) => mapping,
		Value::Null => return Ok(Vec::new()),
		other => return Err(ConvertError::shape("mapping", other)),
	};

	mapping
		.iter()
		.map(|(key, value)| match key {
			Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok((node_to_text(key), value)),
			other => Err(ConvertError::shape("scalar key", other)),
		})
		.collect()
}

fn to_mapping<'a, T, I>(entries: I) -> Result<Value, ConvertError>
where
	T: Convert + 'a,
	I: IntoIterator<Item = (&'a String, &'a T)>,
{
	let mut mapping = Mapping::new();
	for (key, value) in entries {
		mapping.insert(Value::String(key.clone()), value.to_node()?);
	}
	Ok(Value::Mapping(mapping))
}

fn from_mapping<T, C>(node: &Value) -> Result<C, ConvertError>
where
	T: Convert,
	C: FromIterator<(String, T)>,
{
	mapping_entries(node)?
		.into_iter()
		.map(|(key, value)| T::from_node(value).map(|value| (key, value)))
		.collect()
}

impl<T: Convert> Convert for Vec<T> {
	fn to_node(&self) -> Result<Value, ConvertError> {
		to_sequence(self)
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		from_sequence(node)
	}
}

impl<T: Convert> Convert for VecDeque<T> {
	fn to_node(&self) -> Result<Value, ConvertError> {
		to_sequence(self)
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		from_sequence(node)
	}
}

impl<T: Convert> Convert for LinkedList<T> {
	fn to_node(&self) -> Result<Value, ConvertError> {
		to_sequence(self)
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		from_sequence(node)
	}
}

impl<T: Convert + Ord> Convert for BTreeSet<T> {
	fn to_node(&self) -> Result<Value, ConvertError> {
		to_sequence(self)
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		from_sequence(node)
	}
}

impl<T, S> Convert for HashSet<T, S>
where
	T: Convert + Eq + Hash,
	S: BuildHasher + Default,
{
	fn to_node(&self) -> Result<Value, ConvertError> {
		to_sequence(self)
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		from_sequence(node)
	}
}

impl<T: Convert> Convert for BTreeMap<String, T> {
	fn to_node(&self) -> Result<Value, ConvertError> {
		to_mapping(self)
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		from_mapping(node)
	}
}

impl<T, S> Convert for HashMap<String, T, S>
where
	T: Convert,
	S: BuildHasher + Default,
{
	fn to_node(&self) -> Result<Value, ConvertError> {
		to_mapping(self)
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		from_mapping(node)
	}
}

impl<T: Convert> Convert for Option<T> {
	fn to_node(&self) -> Result<Value, ConvertError> {
		match self {
			Some(value) => value.to_node(),
			None => Ok(Value::Null),
		}
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		match node {
			Value::Null => Ok(None),
			other => T::from_node(other).map(Some),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_vec_preserves_order() {
		let v = vec![3, 1, 2];
		let text = v.to_text().unwrap();
		assert_eq!(Vec::<i32>::from_text(&text).unwrap(), v);
		assert_eq!(LinkedList::<i32>::from_text(&text).unwrap().into_iter().collect::<Vec<_>>(), v);
	}

	#[test]
	fn test_sets_compare_by_membership() {
		let set: HashSet<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
		let back = HashSet::<String>::from_text(&set.to_text().unwrap()).unwrap();
		assert_eq!(back, set);

		let ordered = BTreeSet::<u16>::from_text("[9, 2, 2, 5]").unwrap();
		assert_eq!(ordered.into_iter().collect::<Vec<_>>(), vec![2, 5, 9]);
	}

	#[test]
	fn test_maps_keep_keys_case_sensitive() {
		let map = HashMap::<String, i32>::from_text("Port: 1\nport: 2").unwrap();
		assert_eq!(map.len(), 2);
		assert_eq!(map["Port"], 1);
		assert_eq!(map["port"], 2);

		let back = HashMap::<String, i32>::from_text(&map.to_text().unwrap()).unwrap();
		assert_eq!(back, map);
	}

	#[test]
	fn test_numeric_map_keys_become_text() {
		let map = BTreeMap::<String, String>::from_text("80: http\n443: https").unwrap();
		assert_eq!(map["443"], "https");
	}

	#[test]
	fn test_nested_containers() {
		let text = "a: [1, 2]\nb: []";
		let nested = BTreeMap::<String, Vec<u8>>::from_text(text).unwrap();
		assert_eq!(nested["a"], vec![1, 2]);
		assert!(nested["b"].is_empty());
		assert_eq!(BTreeMap::<String, Vec<u8>>::from_text(&nested.to_text().unwrap()).unwrap(), nested);
	}

	#[test]
	fn test_shape_mismatch_is_reported() {
		let err = Vec::<i32>::from_text("a: 1").unwrap_err();
		assert!(matches!(
			err,
			ConvertError::Shape {
				expected: "sequence",
				found: "mapping"
			}
		));
		assert!(Vec::<i32>::from_text("[1, two]").is_err());
	}

	#[test]
	fn test_option_maps_null() {
		assert_eq!(Option::<i32>::from_text("").unwrap(), None);
		assert_eq!(Option::<i32>::from_text("5").unwrap(), Some(5));
		assert_eq!(None::<i32>.to_text().unwrap(), "");
	}
}
