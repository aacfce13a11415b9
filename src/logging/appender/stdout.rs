/* src/logging/appender/stdout.rs */

use std::io::{self, Write};

use super::{AppenderCore, LogAppender};
use crate::logging::define::AppenderKind;

/// Writes records to standard output.
#[derive(Debug, Default)]
pub struct StdoutAppender {
	core: AppenderCore,
}

impl StdoutAppender {
	pub fn new() -> Self {
		Self::default()
	}
}

impl LogAppender for StdoutAppender {
	fn core(&self) -> &AppenderCore {
		&self.core
	}

	fn write(&self, text: &str) -> io::Result<()> {
		let mut out = io::stdout().lock();
		out.write_all(text.as_bytes())?;
		out.flush()
	}

	fn kind(&self) -> AppenderKind {
		AppenderKind::Stdout
	}
}
