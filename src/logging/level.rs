/* src/logging/level.rs */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::LogError;

/// Severity of a log record, ordered from most to least verbose.
///
/// `Off` is the disabled threshold: a logger or appender set to `Off`
/// accepts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LogLevel {
	#[default]
	Debug = 1,
	Info = 2,
	Warn = 3,
	Error = 4,
	Fatal = 5,
	Off = 6,
}

impl LogLevel {
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Debug => "DEBUG",
			Self::Info => "INFO",
			Self::Warn => "WARN",
			Self::Error => "ERROR",
			Self::Fatal => "FATAL",
			Self::Off => "OFF",
		}
	}

	pub(crate) const fn from_u8(raw: u8) -> Self {
		match raw {
			0 | 1 => Self::Debug,
			2 => Self::Info,
			3 => Self::Warn,
			4 => Self::Error,
			5 => Self::Fatal,
			_ => Self::Off,
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = LogError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let level = match s.trim().to_ascii_uppercase().as_str() {
			"DEBUG" => Self::Debug,
			"INFO" => Self::Info,
			"WARN" => Self::Warn,
			"ERROR" => Self::Error,
			"FATAL" => Self::Fatal,
			"OFF" => Self::Off,
			_ => return Err(LogError::UnknownLevel(s.to_string())),
		};
		Ok(level)
	}
}

impl Serialize for LogLevel {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for LogLevel {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}

impl From<log::Level> for LogLevel {
	fn from(level: log::Level) -> Self {
		match level {
			log::Level::Trace | log::Level::Debug => Self::Debug,
			log::Level::Info => Self::Info,
			log::Level::Warn => Self::Warn,
			log::Level::Error => Self::Error,
		}
	}
}
