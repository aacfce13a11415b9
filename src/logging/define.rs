/* src/logging/define.rs */

//!
//! Declarative logger definitions, the shape of the `logs` config value.
//!
//! ```yaml
//! logs:
//!   - name: root
//!     level: INFO
//!     formatter: "%d%T%m%n"
//!     appenders:
//!       - type: FileLogAppender
//!         file: /var/log/app/root.log
//!       - type: StdoutLogAppender
//!         level: WARN
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{LogError, LogLevel};
use crate::convert::{Convert, ConvertError, Value, serde_from_node, serde_to_node};

const STDOUT_TYPE: &str = "StdoutLogAppender";
const FILE_TYPE: &str = "FileLogAppender";

/// Where an appender writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppenderKind {
	Stdout,
	File { file: PathBuf },
}

/// Desired state of one appender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAppender", into = "RawAppender")]
pub struct LogAppenderDefine {
	pub kind: AppenderKind,
	pub level: Option<LogLevel>,
	pub formatter: Option<String>,
}

impl LogAppenderDefine {
	pub fn stdout() -> Self {
		Self {
			kind: AppenderKind::Stdout,
			level: None,
			formatter: None,
		}
	}

	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self {
			kind: AppenderKind::File { file: path.into() },
			level: None,
			formatter: None,
		}
	}

	pub fn with_level(mut self, level: LogLevel) -> Self {
		self.level = Some(level);
		self
	}

	pub fn with_formatter(mut self, pattern: impl Into<String>) -> Self {
		self.formatter = Some(pattern.into());
		self
	}
}

#[derive(Serialize, Deserialize)]
struct RawAppender {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	level: Option<LogLevel>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	formatter: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	file: Option<PathBuf>,
}

impl TryFrom<RawAppender> for LogAppenderDefine {
	type Error = LogError;

	fn try_from(raw: RawAppender) -> Result<Self, Self::Error> {
		let kind = match raw.kind.as_str() {
			STDOUT_TYPE => AppenderKind::Stdout,
			FILE_TYPE => match raw.file {
				Some(file) if !file.as_os_str().is_empty() => AppenderKind::File { file },
				_ => {
					return Err(LogError::InvalidDefine(format!(
						"{} requires a file",
						FILE_TYPE
					)));
				}
			},
			other => {
				return Err(LogError::InvalidDefine(format!(
					"unknown appender type {:?}",
					other
				)));
			}
		};

		Ok(Self {
			kind,
			level: raw.level,
			formatter: raw.formatter.filter(|p| !p.is_empty()),
		})
	}
}

impl From<LogAppenderDefine> for RawAppender {
	fn from(define: LogAppenderDefine) -> Self {
		let (kind, file) = match define.kind {
			AppenderKind::Stdout => (STDOUT_TYPE, None),
			AppenderKind::File { file } => (FILE_TYPE, Some(file)),
		};
		Self {
			kind: kind.to_string(),
			level: define.level,
			formatter: define.formatter,
			file,
		}
	}
}

/// Desired state of one logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDefine {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub level: Option<LogLevel>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub formatter: Option<String>,
	#[serde(default)]
	pub appenders: Vec<LogAppenderDefine>,
}

impl LogDefine {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			level: None,
			formatter: None,
			appenders: Vec::new(),
		}
	}

	pub fn with_level(mut self, level: LogLevel) -> Self {
		self.level = Some(level);
		self
	}

	pub fn with_formatter(mut self, pattern: impl Into<String>) -> Self {
		self.formatter = Some(pattern.into());
		self
	}

	pub fn with_appender(mut self, appender: LogAppenderDefine) -> Self {
		self.appenders.push(appender);
		self
	}
}

/// A set of logger definitions keyed by logger name.
///
/// Converts to and from a sequence of [`LogDefine`]; when a name appears
/// twice, the later entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogDefines(BTreeMap<String, LogDefine>);

impl LogDefines {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces the definition for `define.name`.
	pub fn insert(&mut self, define: LogDefine) -> Option<LogDefine> {
		self.0.insert(define.name.clone(), define)
	}

	pub fn get(&self, name: &str) -> Option<&LogDefine> {
		self.0.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Definitions in name order.
	pub fn iter(&self) -> impl Iterator<Item = &LogDefine> {
		self.0.values()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<LogDefine> for LogDefines {
	fn from_iter<I: IntoIterator<Item = LogDefine>>(iter: I) -> Self {
		let mut defines = Self::new();
		for define in iter {
			defines.insert(define);
		}
		defines
	}
}

impl Convert for LogDefines {
	fn to_node(&self) -> Result<Value, ConvertError> {
		serde_to_node(&self.iter().collect::<Vec<_>>())
	}

	fn from_node(node: &Value) -> Result<Self, ConvertError> {
		if node.is_null() {
			return Ok(Self::new());
		}
		let list: Vec<LogDefine> = serde_from_node(node)?;
		if list.iter().any(|d| d.name.trim().is_empty()) {
			return Err(ConvertError::Custom(
				"logger definition without a name".to_string(),
			));
		}
		Ok(list.into_iter().collect())
	}
}
