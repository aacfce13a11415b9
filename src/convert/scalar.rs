/* src/convert/scalar.rs */

use std::path::PathBuf;

use serde_yaml::Number;

use super::{Convert, ConvertError, Value, node_to_text};

macro_rules! integer_convert {
	($($ty:ty),+ $(,)?) => {
		$(
			impl Convert for $ty {
				fn to_node(&self) -> Result<Value, ConvertError> {
					Ok(Value::Number(Number::from(*self)))
				}

				fn from_node(node: &Value) -> Result<Self, ConvertError> {
					match node {
						Value::Number(n) => n
							.as_i64()
							.and_then(|v| <$ty>::try_from(v).ok())
							.or_else(|| n.as_u64().and_then(|v| <$ty>::try_from(v).ok()))
							.ok_or_else(|| ConvertError::parse::<$ty>(n.to_string())),
						Value::String(s) => Self::from_text(s),
						other => Err(ConvertError::shape("integer", other)),
					}
				}

				fn to_text(&self) -> Result<String, ConvertError> {
					Ok(self.to_string())
				}

				fn from_text(text: &str) -> Result<Self, ConvertError> {
					text.trim()
						.parse()
						.map_err(|_| ConvertError::parse::<$ty>(text))
				}
			}
		)+
	};
}

integer_convert!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_convert {
	($($ty:ty),+ $(,)?) => {
		$(
			impl Convert for $ty {
				fn to_node(&self) -> Result<Value, ConvertError> {
					Ok(Value::Number(Number::from(f64::from(*self))))
				}

				fn from_node(node: &Value) -> Result<Self, ConvertError> {
					match node {
						// Narrowing to f32 is the documented precision loss of the target type.
						Value::Number(n) => n
							.as_f64()
							.map(|v| v as $ty)
							.ok_or_else(|| ConvertError::parse::<$ty>(n.to_string())),
						Value::String(s) => Self::from_text(s),
						other => Err(ConvertError::shape("float", other)),
					}
				}

				fn to_text(&self) -> Result<String, ConvertError> {
					Ok(self.to_string())
				}

				fn from_text(text: &str) -> Result<Self, ConvertError> {
					text.trim()
						.parse()
						.map_err(|_| ConvertError::parse::<$ty>(text))
				}
			}
		)+
	};
}

float_convert!(f32, f64);

impl Convert for bool {
	fn to_node(&self) -> Result<Value, ConvertError> {
		Ok(Value::Bool(*self))
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		match node {
			Value::Bool(b) => Ok(*b),
			Value::String(s) => Self::from_text(s),
			other => Err(ConvertError::shape("bool", other)),
		}
	}

	fn to_text(&self) -> Result<String, ConvertError> {
		Ok(self.to_string())
	}

	fn from_text(text: &str) -> Result<Self, ConvertError> {
		let text = text.trim();
		if text.eq_ignore_ascii_case("true") {
			Ok(true)
		} else if text.eq_ignore_ascii_case("false") {
			Ok(false)
		} else {
			Err(ConvertError::parse::<bool>(text))
		}
	}
}

impl Convert for char {
	fn to_node(&self) -> Result<Value, ConvertError> {
		Ok(Value::String(self.to_string()))
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		match node {
			Value::String(s) => Self::from_text(s),
			Value::Number(n) => Self::from_text(&n.to_string()),
			other => Err(ConvertError::shape("char", other)),
		}
	}

	fn to_text(&self) -> Result<String, ConvertError> {
		Ok(self.to_string())
	}

	fn from_text(text: &str) -> Result<Self, ConvertError> {
		let mut chars = text.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => Ok(c),
			_ => Err(ConvertError::parse::<char>(text)),
		}
	}
}

/// Strings accept any node: scalars as their literal text, nested nodes as YAML.
impl Convert for String {
	fn to_node(&self) -> Result<Value, ConvertError> {
		Ok(Value::String(self.clone()))
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		Ok(node_to_text(node))
	}

	fn to_text(&self) -> Result<String, ConvertError> {
		Ok(self.clone())
	}

	fn from_text(text: &str) -> Result<Self, ConvertError> {
		Ok(text.to_string())
	}
}

impl Convert for PathBuf {
	fn to_node(&self) -> Result<Value, ConvertError> {
		Ok(Value::String(self.to_string_lossy().into_owned()))
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		match node {
			Value::String(s) => Ok(PathBuf::from(s)),
			other => Err(ConvertError::shape("path", other)),
		}
	}

	fn to_text(&self) -> Result<String, ConvertError> {
		Ok(self.to_string_lossy().into_owned())
	}

	fn from_text(text: &str) -> Result<Self, ConvertError> {
		Ok(PathBuf::from(text))
	}
}
