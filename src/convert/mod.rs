/* src/convert/mod.rs */

//!
//! Bidirectional conversion between typed values and the YAML tree/text form.
//!
//! Every config variable stores a typed value but is loaded from, and exported
//! to, a document tree. [`Convert`] is the protocol that bridges the two:
//!
//! - scalars (integers, floats, `bool`, `char`, `String`, `PathBuf`) format and
//!   parse directly;
//! - sequences (`Vec`, `VecDeque`, `LinkedList`, `BTreeSet`, `HashSet`) map to
//!   YAML sequences, converting each element independently;
//! - string-keyed maps (`BTreeMap<String, _>`, `HashMap<String, _>`) map to
//!   YAML mappings.
//!
//! User types join the protocol by implementing [`Convert`], usually through
//! [`convert_via_serde!`](crate::convert_via_serde) or
//! [`convert_with!`](crate::convert_with). Container rules are generic, so
//! `Vec<MyType>` converts as soon as `MyType` does.

mod collection;
mod error;
mod scalar;

pub use error::ConvertError;
pub use serde_yaml::Value;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Two-way conversion between a value and its tree/text representation.
pub trait Convert: Sized {
	/// Converts the value into a document node.
	fn to_node(&self) -> Result<Value, ConvertError>;

	/// Builds a value from a document node.
	fn from_node(node: &Value) -> Result<Self, ConvertError>;

	/// Converts the value into its canonical text form.
	fn to_text(&self) -> Result<String, ConvertError> {
		Ok(node_to_text(&self.to_node()?))
	}

	/// Parses the canonical text form.
	fn from_text(text: &str) -> Result<Self, ConvertError> {
		Self::from_node(&text_to_node(text)?)
	}
}

/// Renders a node as text. Scalars render bare, everything else as YAML.
pub fn node_to_text(node: &Value) -> String {
	match node {
		Value::Null => String::new(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		other => serde_yaml::to_string(other).unwrap_or_default(),
	}
}

/// Parses text as a YAML document. Blank text is a null node.
pub fn text_to_node(text: &str) -> Result<Value, ConvertError> {
	if text.trim().is_empty() {
		return Ok(Value::Null);
	}
	Ok(serde_yaml::from_str(text)?)
}

/// Converts any serializable value into a node.
pub fn serde_to_node<T: Serialize>(value: &T) -> Result<Value, ConvertError> {
	Ok(serde_yaml::to_value(value)?)
}

/// Builds any deserializable value from a node.
pub fn serde_from_node<T: DeserializeOwned>(node: &Value) -> Result<T, ConvertError> {
	Ok(serde_yaml::from_value(node.clone())?)
}

/// Returns a short, human-readable name for the kind of a node.
pub fn node_kind(node: &Value) -> &'static str {
	match node {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Sequence(_) => "sequence",
		Value::Mapping(_) => "mapping",
		Value::Tagged(_) => "tagged value",
	}
}

/// Registers types with the conversion protocol using their serde impls.
///
/// ```ignore
/// #[derive(Clone, PartialEq, Serialize, Deserialize)]
/// struct Person { name: String, age: u32 }
///
/// livelog::convert_via_serde!(Person);
/// ```
#[macro_export]
macro_rules! convert_via_serde {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $crate::convert::Convert for $ty {
				fn to_node(
					&self,
				) -> ::std::result::Result<$crate::convert::Value, $crate::convert::ConvertError> {
					$crate::convert::serde_to_node(self)
				}

				fn from_node(
					node: &$crate::convert::Value,
				) -> ::std::result::Result<Self, $crate::convert::ConvertError> {
					$crate::convert::serde_from_node(node)
				}
			}
		)+
	};
}

/// Registers a type with the conversion protocol from an explicit pair of
/// conversion functions.
///
/// ```ignore
/// fn port_to_node(p: &Port) -> Result<Value, ConvertError> { .. }
/// fn port_from_node(node: &Value) -> Result<Port, ConvertError> { .. }
///
/// livelog::convert_with!(Port, port_to_node, port_from_node);
/// ```
#[macro_export]
macro_rules! convert_with {
	($ty:ty, $to:path, $from:path $(,)?) => {
		impl $crate::convert::Convert for $ty {
			fn to_node(
				&self,
			) -> ::std::result::Result<$crate::convert::Value, $crate::convert::ConvertError> {
				$to(self)
			}

			fn from_node(
				node: &$crate::convert::Value,
			) -> ::std::result::Result<Self, $crate::convert::ConvertError> {
				$from(node)
			}
		}
	};
}
